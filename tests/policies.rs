//! Stacking policies: singleton, dismiss-current/all, child cascade and flag validation.

#[macro_use]
mod common;

use common::*;
use viewvisor::{
    Controller, ControllerContext, ControllerError, Dependency, OperationStatus, PresentArgs,
    PresentError, PresentFlags, Presentable, Resolver,
};

screen!(Menu);
screen!(Settings);
screen!(Help);
screen!(Toast, PresentFlags::POPUP);
screen!(Inventory, PresentFlags::SINGLETON);

struct Clock;

/// Declares a clock nobody registers.
struct Stopwatch;

impl Controller for Stopwatch {}

impl Presentable for Stopwatch {
    const REQUIRES: &'static [Dependency] = &[Dependency::of::<Clock>()];

    fn create(_ctx: ControllerContext, services: &Resolver<'_>) -> Result<Self, ControllerError> {
        services.get::<Clock>()?;
        Ok(Stopwatch)
    }
}

// -- singleton ----------------------------------------------------------------

#[tokio::test]
async fn singleton_replaces_the_existing_instance() {
    let h = Harness::new();
    let first = h.presenter.present::<Inventory>(PresentArgs::new());
    first.wait().await.unwrap();
    let second = h.presenter.present::<Inventory>(PresentArgs::new());
    second.wait().await.unwrap();

    assert_eq!(h.stack(), ["Inventory"]);
    assert!(first.is_dismissed());
    assert!(!second.is_dismissed());
    assert_ne!(first.controller().unwrap().id(), second.controller().unwrap().id());
    assert_eq!(
        h.journal.entries(),
        [
            "Inventory.create",
            "Inventory.present",
            "Inventory.activate",
            "Inventory.deactivate",
            "Inventory.dismiss",
            "Inventory.create",
            "Inventory.present",
            "Inventory.activate",
        ]
    );
}

#[tokio::test]
async fn singleton_from_args_finds_instances_anywhere_in_the_stack() {
    let h = Harness::new();
    let old = h.presenter.present::<Settings>(PresentArgs::new());
    old.wait().await.unwrap();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();

    h.presenter
        .present::<Settings>(PresentArgs::flags_only(PresentFlags::SINGLETON))
        .wait()
        .await
        .unwrap();

    assert_eq!(h.stack(), ["Menu", "Settings"]);
    assert!(old.is_dismissed());
    assert_eq!(h.active(), Some("Settings"));
}

// -- dismiss current / all ----------------------------------------------------

#[tokio::test]
async fn dismiss_current_replaces_the_top() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    h.presenter.present::<Settings>(PresentArgs::new()).wait().await.unwrap();
    h.journal.clear();

    h.presenter
        .present::<Help>(PresentArgs::flags_only(PresentFlags::DISMISS_CURRENT))
        .wait()
        .await
        .unwrap();

    assert_eq!(h.stack(), ["Menu", "Help"]);
    assert_eq!(
        h.journal.entries(),
        [
            "Settings.deactivate",
            "Settings.dismiss",
            "Help.create",
            "Help.present",
            "Help.activate",
        ]
    );
}

#[tokio::test]
async fn dismiss_all_clears_the_stack_first() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    h.presenter.present::<Settings>(PresentArgs::new()).wait().await.unwrap();
    h.journal.clear();

    h.presenter
        .present::<Help>(PresentArgs::flags_only(PresentFlags::DISMISS_ALL))
        .wait()
        .await
        .unwrap();

    assert_eq!(h.stack(), ["Help"]);
    assert_eq!(
        h.journal.entries(),
        [
            "Settings.deactivate",
            "Settings.dismiss",
            "Menu.dismiss",
            "Help.create",
            "Help.present",
            "Help.activate",
        ]
    );
}

#[tokio::test]
async fn policy_dismissals_are_not_rolled_back() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    h.presenter.present::<Settings>(PresentArgs::new()).wait().await.unwrap();
    h.journal.fail_on("Help.create");

    let handle = h
        .presenter
        .present::<Help>(PresentArgs::flags_only(PresentFlags::DISMISS_CURRENT));
    let err = handle.wait().await.unwrap_err();

    assert!(matches!(err, PresentError::Construction { controller: "Help", .. }));
    assert_eq!(h.stack(), ["Menu"]);
    assert_eq!(h.active(), Some("Menu"));
}

// -- child cascade ------------------------------------------------------------

#[tokio::test]
async fn children_are_dismissed_before_their_parent_newest_first() {
    let h = Harness::new();
    let menu = h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();

    let settings = menu
        .with(|m: &mut Menu| m.ctx.present_child::<Settings>(PresentArgs::new()))
        .unwrap();
    let settings = settings.wait().await.unwrap();
    let toast = settings
        .with(|s: &mut Settings| s.ctx.present_child::<Toast>(PresentArgs::new()))
        .unwrap();
    toast.wait().await.unwrap();
    assert_eq!(h.stack(), ["Menu", "Settings", "Toast"]);
    assert!(settings.flags().contains(PresentFlags::CHILD));
    h.journal.clear();

    h.presenter.dismiss(&menu).wait().await.unwrap();

    assert!(h.presenter.is_empty());
    assert_eq!(
        h.journal.entries(),
        ["Toast.deactivate", "Toast.dismiss", "Settings.dismiss", "Menu.dismiss"]
    );
}

#[tokio::test]
async fn unrelated_controllers_survive_a_cascade() {
    let h = Harness::new();
    let menu = h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    menu.with(|m: &mut Menu| m.ctx.present_child::<Settings>(PresentArgs::new()))
        .unwrap()
        .wait()
        .await
        .unwrap();
    // presented by Menu, but not as a child
    menu.with(|m: &mut Menu| m.ctx.present::<Help>(PresentArgs::new()))
        .unwrap()
        .wait()
        .await
        .unwrap();
    h.journal.clear();

    h.presenter.dismiss(&menu).wait().await.unwrap();

    assert_eq!(h.stack(), ["Help"]);
    assert_eq!(h.active(), Some("Help"));
    assert_eq!(h.journal.entries(), ["Settings.dismiss", "Menu.dismiss"]);
}

#[tokio::test]
async fn child_of_a_dismissed_parent_is_refused() {
    let h = Harness::new();
    let menu = h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();

    let dismiss = h.presenter.dismiss(&menu);
    let child = menu
        .with(|m: &mut Menu| m.ctx.present_child::<Settings>(PresentArgs::new()))
        .unwrap();
    dismiss.wait().await.unwrap();

    let err = child.wait().await.unwrap_err();
    assert_eq!(err, PresentError::ParentDismissed { controller: "Settings" });
    assert!(child.controller().is_none());
    assert!(h.presenter.is_empty());
    assert!(!h.journal.contains("Settings.create"));
}

#[tokio::test]
async fn plain_presents_outlive_the_presenting_controller() {
    let h = Harness::new();
    let menu = h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    let ctx = menu.with(|m: &mut Menu| m.ctx.clone()).unwrap();
    h.presenter.dismiss(&menu).wait().await.unwrap();

    let help = ctx.present::<Help>(PresentArgs::new()).wait().await.unwrap();
    assert!(!help.flags().contains(PresentFlags::CHILD));
    assert_eq!(h.stack(), ["Help"]);

    // children still need a live parent
    let err = ctx
        .present_child::<Settings>(PresentArgs::new())
        .wait()
        .await
        .unwrap_err();
    assert_eq!(err, PresentError::ParentDismissed { controller: "Settings" });
    assert_eq!(h.stack(), ["Help"]);
}

#[tokio::test]
async fn child_flag_without_a_parent_is_dropped() {
    let h = Harness::new();
    let settings = h
        .presenter
        .present::<Settings>(PresentArgs::flags_only(PresentFlags::CHILD))
        .wait()
        .await
        .unwrap();
    assert!(!settings.flags().contains(PresentFlags::CHILD));
}

// -- validation ---------------------------------------------------------------

#[tokio::test]
async fn forbidden_flag_combinations_fail_before_queueing() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();

    for flags in [
        PresentFlags::EXCLUSIVE | PresentFlags::POPUP,
        PresentFlags::EXCLUSIVE | PresentFlags::MODAL,
    ] {
        let handle = h.presenter.present::<Settings>(PresentArgs::flags_only(flags));
        assert_eq!(handle.status(), OperationStatus::Faulted);
        let err = handle.wait().await.unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, PresentError::InvalidFlags { .. }));
    }

    // type flags take part in validation too
    let handle = h
        .presenter
        .present::<Toast>(PresentArgs::flags_only(PresentFlags::EXCLUSIVE));
    assert!(matches!(handle.wait().await, Err(PresentError::InvalidFlags { .. })));

    assert_eq!(h.stack(), ["Menu"]);
    assert_eq!(h.active(), Some("Menu"));
    assert!(!h.journal.contains("Settings.create"));
}

#[tokio::test]
async fn missing_declared_services_fail_before_any_dismissal() {
    let h = Harness::new();
    h.presenter.present::<Menu>(PresentArgs::new()).wait().await.unwrap();
    h.presenter.present::<Settings>(PresentArgs::new()).wait().await.unwrap();
    h.journal.clear();

    let handle = h
        .presenter
        .present::<Stopwatch>(PresentArgs::flags_only(PresentFlags::DISMISS_CURRENT));
    assert_eq!(handle.status(), OperationStatus::Faulted);

    let err = handle.wait().await.unwrap_err();
    assert!(err.is_configuration());
    match err {
        PresentError::Unresolved { controller, service } => {
            assert_eq!(controller, "Stopwatch");
            assert!(service.ends_with("Clock"));
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(h.stack(), ["Menu", "Settings"]);
    assert_eq!(h.active(), Some("Settings"));
    assert!(h.journal.entries().is_empty());
}

#[tokio::test]
async fn modal_popup_is_allowed() {
    let h = Harness::new();
    let settings = h
        .presenter
        .present::<Settings>(PresentArgs::flags_only(PresentFlags::MODAL_POPUP))
        .wait()
        .await
        .unwrap();
    assert!(settings.flags().contains(PresentFlags::MODAL_POPUP));
}
