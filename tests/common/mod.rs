//! Shared fixtures for presenter integration tests.
//!
//! - [`Journal`]: service every test controller records its lifecycle into, and the
//!   switchboard for injected hook failures.
//! - [`Views`]: scriptable view factory (fail, panic, hang, release failures).
//! - `screen!`: declares a journaled controller type.
//! - [`Recorder`]: subscriber that keeps every event it sees.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, broadcast};
use viewvisor::{
    CommandSink, ControllerError, Event, EventKind, Presenter, PresenterBuilder, PresenterConfig,
    ServiceCollection, Subscribe, ViewError, ViewFactory, ViewRef, ViewRequest,
};

// -- journal ------------------------------------------------------------------

/// Ordered record of controller activity.
#[derive(Default)]
pub struct Journal {
    entries: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// Records `entry` and fails if a failure was injected for it.
    pub fn hook(&self, entry: String) -> Result<(), ControllerError> {
        let fail = self.failing.lock().unwrap().contains(&entry);
        self.record(entry.clone());
        if fail {
            return Err(ControllerError::fail(format!("{entry} refused")));
        }
        Ok(())
    }

    /// Makes the next and every later `entry` hook fail.
    pub fn fail_on(&self, entry: &str) {
        self.failing.lock().unwrap().insert(entry.to_owned());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Entries starting with `prefix`, in order.
    pub fn of(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.lock().unwrap().iter().any(|e| e == entry)
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

// -- views --------------------------------------------------------------------

/// What the fake view factory hands out.
#[derive(Debug)]
pub struct TestView {
    pub controller: &'static str,
    pub z_order: usize,
    pub commands: CommandSink,
}

/// Scriptable view factory keyed by controller short name.
#[derive(Default)]
pub struct Views {
    failing: Mutex<HashSet<&'static str>>,
    panicking: Mutex<HashSet<&'static str>>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
    failing_release: Mutex<HashSet<&'static str>>,
    requests: Mutex<Vec<ViewRequest>>,
    released: AtomicUsize,
}

impl Views {
    pub fn fail(&self, controller: &'static str) {
        self.failing.lock().unwrap().insert(controller);
    }

    pub fn panic_on(&self, controller: &'static str) {
        self.panicking.lock().unwrap().insert(controller);
    }

    /// Views for `controller` are only produced once the returned gate is notified.
    pub fn hold(&self, controller: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(controller, Arc::clone(&gate));
        gate
    }

    pub fn fail_release(&self, controller: &'static str) {
        self.failing_release.lock().unwrap().insert(controller);
    }

    pub fn requests(&self) -> Vec<ViewRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ViewFactory for Views {
    async fn create_view(&self, request: ViewRequest) -> Result<ViewRef, ViewError> {
        let name = request.controller.short_name();
        self.requests.lock().unwrap().push(request.clone());

        let gate = self.gates.lock().unwrap().get(name).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.panicking.lock().unwrap().contains(name) {
            panic!("view for {name} exploded");
        }
        if self.failing.lock().unwrap().contains(name) {
            return Err(ViewError::Load(format!("no asset for {name}")));
        }
        Ok(Arc::new(TestView {
            controller: name,
            z_order: request.z_order,
            commands: request.commands,
        }))
    }

    fn release_view(&self, view: ViewRef) -> Result<(), ViewError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        let name = view.downcast_ref::<TestView>().map(|v| v.controller);
        match name {
            Some(name) if self.failing_release.lock().unwrap().contains(name) => {
                Err(ViewError::Release(format!("{name} view still animating")))
            }
            _ => Ok(()),
        }
    }
}

// -- controllers --------------------------------------------------------------

/// Declares a controller that journals every lifecycle step as `Name.step`.
///
/// It handles commands named after itself and records every command offered.
macro_rules! screen {
    ($name:ident) => {
        screen!($name, ::viewvisor::PresentFlags::NONE);
    };
    ($name:ident, $flags:expr) => {
        pub struct $name {
            pub ctx: ::viewvisor::ControllerContext,
            journal: ::std::sync::Arc<$crate::common::Journal>,
        }

        impl ::viewvisor::Controller for $name {
            fn handle_command(&mut self, command: &::viewvisor::Command) -> bool {
                self.journal
                    .record(format!("{}.command:{}", stringify!($name), command.name().unwrap_or("?")));
                command.is_named(stringify!($name))
            }

            fn events(&mut self) -> Option<&mut dyn ::viewvisor::ControllerEvents> {
                Some(self)
            }
        }

        impl ::viewvisor::ControllerEvents for $name {
            fn on_present(&mut self) -> Result<(), ::viewvisor::ControllerError> {
                self.journal.hook(format!("{}.present", stringify!($name)))
            }

            fn on_activate(&mut self) -> Result<(), ::viewvisor::ControllerError> {
                self.journal.hook(format!("{}.activate", stringify!($name)))
            }

            fn on_deactivate(&mut self) -> Result<(), ::viewvisor::ControllerError> {
                self.journal.hook(format!("{}.deactivate", stringify!($name)))
            }

            fn on_dismiss(&mut self) -> Result<(), ::viewvisor::ControllerError> {
                self.journal.hook(format!("{}.dismiss", stringify!($name)))
            }
        }

        impl ::viewvisor::Presentable for $name {
            const FLAGS: ::viewvisor::PresentFlags = $flags;

            fn create(
                ctx: ::viewvisor::ControllerContext,
                services: &::viewvisor::Resolver<'_>,
            ) -> Result<Self, ::viewvisor::ControllerError> {
                let journal = services.get::<$crate::common::Journal>()?;
                journal.hook(format!("{}.create", stringify!($name)))?;
                Ok(Self { ctx, journal })
            }
        }
    };
}

// -- recorder -----------------------------------------------------------------

/// Subscriber keeping every event.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().unwrap().iter().map(|e| e.kind).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

// -- harness ------------------------------------------------------------------

pub struct Harness {
    pub presenter: Arc<Presenter>,
    pub journal: Arc<Journal>,
    pub views: Arc<Views>,
    pub events: broadcast::Receiver<Event>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(PresenterConfig::default(), |b| b)
    }

    /// Builds a harness, letting the test adjust the builder.
    pub fn with(
        cfg: PresenterConfig,
        customize: impl FnOnce(PresenterBuilder) -> PresenterBuilder,
    ) -> Self {
        let journal = Arc::new(Journal::default());
        let views = Arc::new(Views::default());
        let builder = PresenterBuilder::new(cfg, views.clone())
            .with_services(ServiceCollection::new().with_arc(Arc::clone(&journal)));
        let presenter = customize(builder).build();
        let events = presenter.subscribe();
        Self {
            presenter,
            journal,
            views,
            events,
        }
    }

    /// Short type names of the stack, bottom to top.
    pub fn stack(&self) -> Vec<&'static str> {
        self.presenter
            .controllers()
            .iter()
            .map(|c| c.type_name())
            .collect()
    }

    pub fn active(&self) -> Option<&'static str> {
        self.presenter.active_controller().map(|c| c.type_name())
    }

    /// Every event published since the last call.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(ev) = self.events.try_recv() {
            out.push(ev);
        }
        out
    }

    pub fn drain_kinds(&mut self) -> Vec<EventKind> {
        self.drain().into_iter().map(|e| e.kind).collect()
    }
}

/// Polls `cond` until it holds; panics after two seconds.
pub async fn eventually(mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !cond() {
        assert!(tokio::time::Instant::now() < deadline, "condition never became true");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
