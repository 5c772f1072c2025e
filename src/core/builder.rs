use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::{
    controllers::{ControllerRegistry, Presentable},
    core::PresenterConfig,
    events::{Bus, Event},
    services::{ServiceCollection, ServiceProvider, ViewFactory},
    subscribers::{Subscribe, SubscriberSet},
};

use super::{presenter::Presenter, runtime::OperationLoop};

/// Builder for a [`Presenter`].
///
/// ```no_run
/// # use std::sync::Arc;
/// # use viewvisor::{PresenterBuilder, PresenterConfig, ServiceCollection, ViewFactory};
/// # async fn demo(views: Arc<dyn ViewFactory>) {
/// let presenter = PresenterBuilder::new(PresenterConfig::default(), views)
///     .with_services(ServiceCollection::new().with(String::from("en-US")))
///     .build();
/// # presenter.shutdown().await;
/// # }
/// ```
pub struct PresenterBuilder {
    cfg: PresenterConfig,
    views: Arc<dyn ViewFactory>,
    services: Arc<dyn ServiceProvider>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    registry: ControllerRegistry,
}

impl PresenterBuilder {
    /// Creates a builder with an empty service collection and no subscribers.
    pub fn new(cfg: PresenterConfig, views: Arc<dyn ViewFactory>) -> Self {
        Self {
            cfg,
            views,
            services: Arc::new(ServiceCollection::new()),
            subscribers: Vec::new(),
            registry: ControllerRegistry::new(),
        }
    }

    /// Sets the provider controller constructors resolve dependencies from.
    pub fn with_services(mut self, services: impl ServiceProvider) -> Self {
        self.services = Arc::new(services);
        self
    }

    /// Sets an already shared provider.
    pub fn with_shared_services(mut self, services: Arc<dyn ServiceProvider>) -> Self {
        self.services = services;
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive every presenter event through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Makes `C` addressable as `name` by `present_named` and `open`.
    pub fn register<C: Presentable>(mut self, name: impl Into<String>) -> Self {
        self.registry.register::<C>(name);
        self
    }

    /// Replaces the whole registry.
    pub fn with_registry(mut self, registry: ControllerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Builds the presenter and starts its background tasks.
    ///
    /// Must be called inside a tokio runtime:
    /// - the operation loop (drains the queue);
    /// - the subscriber listener (fans bus events out to subscribers).
    pub fn build(self) -> Arc<Presenter> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let (tx, rx) = mpsc::channel(self.cfg.queue_capacity_clamped());
        let runtime_token = CancellationToken::new();
        let stopped = CancellationToken::new();

        if !self.subscribers.is_empty() {
            let subs = SubscriberSet::new(self.subscribers, bus.clone());
            subscriber_listener(bus.subscribe(), subs, stopped.clone());
        }

        let presenter = Arc::new_cyclic(|me| {
            Presenter::new_internal(
                self.cfg,
                bus,
                self.views,
                self.services,
                self.registry,
                tx,
                runtime_token.clone(),
                stopped.clone(),
                me.clone(),
            )
        });

        OperationLoop::new(Arc::downgrade(&presenter), rx, runtime_token, stopped).spawn();
        presenter
    }
}

/// Forwards bus events to the subscriber set until the operation loop has stopped,
/// then drains what is left and shuts the set down.
fn subscriber_listener(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    stopped: CancellationToken,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                ev = rx.recv() => match ev {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber listener lagged behind the bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = stopped.cancelled() => {
                    while let Ok(ev) = rx.try_recv() {
                        set.emit(&ev);
                    }
                    break;
                }
            }
        }
        set.shutdown().await;
    });
}
