//! Present/dismiss basics: stack shape, activation order, handles and snapshots.

#[macro_use]
mod common;

use common::*;
use viewvisor::{
    ControllerState, EventKind, OperationKind, OperationStatus, PresentArgs, PresentFlags,
};

screen!(Menu);
screen!(Settings);
screen!(Toast, PresentFlags::POPUP);

// -- minimal scenario ---------------------------------------------------------

#[tokio::test]
async fn present_then_dismiss_minimal() {
    let h = Harness::new();

    let handle = h.presenter.present::<Menu>(PresentArgs::new());
    let controller = handle.wait().await.unwrap();

    assert!(handle.controller().is_some());
    assert!(!handle.is_dismissed());
    assert_eq!(h.presenter.len(), 1);
    assert!(controller.is::<Menu>());
    assert_eq!(controller.state(), ControllerState::Active);

    handle.dismiss().wait().await.unwrap();
    assert!(handle.is_dismissed());
    assert!(controller.is_dismissed());
    assert_eq!(h.presenter.len(), 0);
    assert_eq!(h.views.released(), 1);

    h.presenter.shutdown().await;
}

#[tokio::test]
async fn dismissed_resolves_after_disposal() {
    let h = Harness::new();
    let handle = h.presenter.present::<Menu>(PresentArgs::new());
    let controller = handle.wait().await.unwrap();

    let waiter = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.dismissed().await })
    };
    h.presenter.dismiss(&controller).wait().await.unwrap();
    waiter.await.unwrap();
    assert_eq!(controller.state(), ControllerState::Disposed);
}

// -- activation ordering ------------------------------------------------------

#[tokio::test]
async fn hooks_fire_in_lifecycle_order() {
    let h = Harness::new();
    let handle = h.presenter.present::<Menu>(PresentArgs::new());
    handle.wait().await.unwrap();
    handle.dismiss().wait().await.unwrap();

    assert_eq!(
        h.journal.of("Menu."),
        ["Menu.create", "Menu.present", "Menu.activate", "Menu.deactivate", "Menu.dismiss"]
    );
}

#[tokio::test]
async fn covered_controller_is_deactivated_and_reactivated() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    let settings = h.presenter.present::<Settings>(PresentArgs::new());
    settings.wait().await.unwrap();

    assert_eq!(h.stack(), ["Menu", "Settings"]);
    assert_eq!(h.active(), Some("Settings"));

    settings.dismiss().wait().await.unwrap();
    assert_eq!(h.stack(), ["Menu"]);
    assert_eq!(h.active(), Some("Menu"));

    assert_eq!(
        h.journal.entries(),
        [
            "Menu.create",
            "Menu.present",
            "Menu.activate",
            "Menu.deactivate",
            "Settings.create",
            "Settings.present",
            "Settings.activate",
            "Settings.deactivate",
            "Settings.dismiss",
            "Menu.activate",
        ]
    );
}

#[tokio::test]
async fn only_the_top_is_ever_active() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    h.presenter.present::<Settings>(PresentArgs::new()).wait().await.unwrap();
    h.presenter.present::<Toast>(PresentArgs::new()).wait().await.unwrap();

    let active: Vec<_> = h
        .presenter
        .controllers()
        .into_iter()
        .filter(|c| c.is_active())
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(Some(&active[0]), h.presenter.peek().as_ref());
}

#[tokio::test]
async fn do_not_activate_holds_until_something_is_pushed_above() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    let settings = h
        .presenter
        .present::<Settings>(PresentArgs::flags_only(PresentFlags::DO_NOT_ACTIVATE))
        .wait()
        .await
        .unwrap();

    assert_eq!(settings.state(), ControllerState::Inactive);
    assert_eq!(h.active(), None);
    assert!(!h.journal.contains("Settings.activate"));

    let toast = h.presenter.present::<Toast>(PresentArgs::new());
    toast.wait().await.unwrap();
    toast.dismiss().wait().await.unwrap();

    assert_eq!(h.active(), Some("Settings"));
    assert!(h.journal.contains("Settings.activate"));
}

// -- requests and snapshots ---------------------------------------------------

#[tokio::test]
async fn view_request_carries_position_flags_and_slot() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    h.presenter
        .present::<Toast>(PresentArgs::new().with_parent_slot("overlay"))
        .wait()
        .await
        .unwrap();

    let requests = h.views.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].z_order, 0);
    assert_eq!(requests[1].z_order, 1);
    assert!(requests[1].flags.contains(PresentFlags::POPUP));
    assert_eq!(requests[1].parent_slot.as_deref(), Some("overlay"));

    let toast = h.presenter.peek().unwrap();
    let view = toast.view().unwrap();
    let view = view.downcast_ref::<TestView>().unwrap();
    assert_eq!(view.controller, "Toast");
    assert_eq!(view.commands.controller(), toast.id());
}

#[tokio::test]
async fn controllers_keep_their_args() {
    let h = Harness::new();
    let menu = h
        .presenter
        .present::<Menu>(PresentArgs::new().with_payload(7_u32).with_tag("main"))
        .wait()
        .await
        .unwrap();

    assert_eq!(menu.args().payload::<u32>(), Some(&7));
    assert_eq!(menu.tag(), Some("main"));
    assert_eq!(menu.with(|m: &mut Menu| m.ctx.args().payload::<u32>().copied()), Some(Some(7)));
    assert_eq!(h.presenter.find_tagged("main"), [menu.clone()]);
    assert_eq!(h.presenter.find::<Menu>(), Some(menu));
    assert!(h.presenter.find::<Settings>().is_none());
}

#[tokio::test]
async fn dismissing_twice_is_a_no_op() {
    let mut h = Harness::new();
    let menu = h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();

    let first = h.presenter.dismiss(&menu);
    let second = h.presenter.dismiss(&menu);
    first.wait().await.unwrap();
    second.wait().await.unwrap();

    assert_eq!(h.journal.of("Menu.dismiss").len(), 1);
    let dismissed = h
        .drain_kinds()
        .into_iter()
        .filter(|k| *k == EventKind::ControllerDismissed)
        .count();
    assert_eq!(dismissed, 1);
}

#[tokio::test]
async fn lifecycle_events_follow_the_operation() {
    let mut h = Harness::new();
    let handle = h.presenter.present::<Menu>(PresentArgs::new());
    handle.wait().await.unwrap();

    let events = h.drain();
    let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [
            EventKind::OperationQueued,
            EventKind::OperationStarted,
            EventKind::ControllerPresented,
            EventKind::ControllerActivated,
            EventKind::OperationSucceeded,
        ]
    );
    assert!(events.windows(2).all(|w| w[0].seq < w[1].seq));
    let done = events.last().unwrap();
    assert_eq!(done.operation, Some(handle.id()));
    assert_eq!(done.operation_kind, Some(OperationKind::Present));
    assert_eq!(done.controller.as_deref(), Some("Menu"));
}

#[tokio::test]
async fn dismiss_all_tears_down_top_to_bottom() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    h.presenter.present::<Settings>(PresentArgs::new()).wait().await.unwrap();
    h.presenter.present::<Toast>(PresentArgs::new()).wait().await.unwrap();
    h.journal.clear();

    let op = h.presenter.dismiss_all();
    op.wait().await.unwrap();

    assert_eq!(op.status(), OperationStatus::Succeeded);
    assert!(h.presenter.is_empty());
    assert_eq!(
        h.journal.entries(),
        ["Toast.deactivate", "Toast.dismiss", "Settings.dismiss", "Menu.dismiss"]
    );
}
