//! # Example: Dialog stack
//!
//! A main menu opens a settings screen from a deep link, the settings screen asks
//! for confirmation through a modal child, and the answer travels back as the
//! dismiss result.
//!
//! Run with: `RUST_LOG=viewvisor=debug cargo run --example dialogs --features logging`

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use viewvisor::{
    Command, Controller, ControllerContext, ControllerError, ControllerEvents, Dependency, Event,
    EventKind, LogWriter, PresentArgs, PresentFlags, PresentHandle, Presentable, PresenterBuilder,
    PresenterConfig, Resolver, ServiceCollection, Subscribe, ViewError, ViewFactory, ViewRef,
    ViewRequest,
};

/// Pretends to load a view asset.
struct Screens;

#[async_trait]
impl ViewFactory for Screens {
    async fn create_view(&self, request: ViewRequest) -> Result<ViewRef, ViewError> {
        println!(
            "[views] create {:?} at z={} flags={:?}",
            request.controller, request.z_order, request.flags
        );
        Ok(Arc::new(request.commands))
    }

    fn release_view(&self, _view: ViewRef) -> Result<(), ViewError> {
        println!("[views] release");
        Ok(())
    }
}

struct Locale(&'static str);

struct MainMenu;

impl Controller for MainMenu {
    fn handle_command(&mut self, command: &Command) -> bool {
        if command.is_named("quit") {
            println!("[menu] quit requested");
            return true;
        }
        false
    }
}

impl Presentable for MainMenu {
    const FLAGS: PresentFlags = PresentFlags::EXCLUSIVE;

    fn create(_ctx: ControllerContext, _services: &Resolver<'_>) -> Result<Self, ControllerError> {
        Ok(MainMenu)
    }
}

struct Settings {
    ctx: ControllerContext,
    locale: Arc<Locale>,
    confirm: Option<PresentHandle>,
}

impl Controller for Settings {
    fn handle_command(&mut self, command: &Command) -> bool {
        if command.is_named("reset") {
            self.confirm = Some(self.ctx.present_child::<Confirm>(PresentArgs::new()));
            return true;
        }
        false
    }

    fn events(&mut self) -> Option<&mut dyn ControllerEvents> {
        Some(self)
    }
}

impl ControllerEvents for Settings {
    fn on_present(&mut self) -> Result<(), ControllerError> {
        let tab = self.ctx.args().query("tab").unwrap_or("general");
        println!("[settings] opened on tab '{tab}' ({})", self.locale.0);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), ControllerError> {
        println!("[settings] has focus");
        if let Some(answer) = self.confirm.take().and_then(|h| h.take_result::<bool>()) {
            println!("[settings] reset confirmed: {answer}");
        }
        Ok(())
    }
}

impl Presentable for Settings {
    const REQUIRES: &'static [Dependency] = &[Dependency::of::<Locale>()];

    fn create(ctx: ControllerContext, services: &Resolver<'_>) -> Result<Self, ControllerError> {
        Ok(Self {
            ctx,
            locale: services.get()?,
            confirm: None,
        })
    }
}

struct Confirm {
    ctx: ControllerContext,
}

impl Controller for Confirm {
    fn handle_command(&mut self, command: &Command) -> bool {
        match command.name() {
            Some("yes") => {
                self.ctx.dismiss_with(true);
                true
            }
            Some("no") => {
                self.ctx.dismiss_with(false);
                true
            }
            _ => false,
        }
    }
}

impl Presentable for Confirm {
    const FLAGS: PresentFlags = PresentFlags::MODAL_POPUP;

    fn create(ctx: ControllerContext, _services: &Resolver<'_>) -> Result<Self, ControllerError> {
        Ok(Self { ctx })
    }
}

/// Waits until `controller` goes through `kind`.
async fn wait_for(
    events: &mut broadcast::Receiver<Event>,
    kind: EventKind,
    controller: &str,
) -> anyhow::Result<()> {
    loop {
        let ev = events.recv().await?;
        if ev.kind == kind && ev.controller.as_deref() == Some(controller) {
            return Ok(());
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let presenter = PresenterBuilder::new(PresenterConfig::default(), Arc::new(Screens))
        .with_services(ServiceCollection::new().with(Locale("en-US")))
        .with_subscribers(subs)
        .register::<MainMenu>("menu")
        .register::<Settings>("settings")
        .build();

    presenter.open("app://menu").wait().await?;
    let settings = presenter.open("app://menu/settings?tab=audio");
    settings.wait().await?;

    let mut events = presenter.subscribe();
    presenter.dispatch("reset");
    wait_for(&mut events, EventKind::ControllerActivated, "Confirm").await?;

    // The modal swallows everything it does not handle.
    println!("[main] quit handled behind modal: {}", presenter.dispatch("quit"));

    presenter.dispatch("yes");
    wait_for(&mut events, EventKind::ControllerDisposed, "Confirm").await?;
    println!("[main] stack after confirm: {:?}", presenter.controllers());

    settings.dismiss().wait().await?;
    println!("[main] quit handled by menu: {}", presenter.dispatch("quit"));

    presenter.shutdown().await;
    Ok(())
}
