//! Broadcast: a weather publisher reports on every location its subscribers
//! asked for.

use crate::{DemoError, Publisher, Subscriber};
use example_sockrpc_service_definition::{
    MessageString, MessageWeather, SubscribeBroadcast, Void, WeatherBroadcast,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sockrpc_service_caller::{Channel, RpcInvoke};
use sockrpc_service_endpoint::{MethodRegistryBuilder, Service};
use sockrpc_transport::SocketAddress;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Temperatures are drawn from `0..MAX_TEMPERATURE`.
pub const MAX_TEMPERATURE: i32 = 80;

/// The publisher's request service: records which locations to report on.
pub struct WeatherService {
    channel: Arc<Channel>,
    locations: Mutex<BTreeSet<String>>,
}

impl WeatherService {
    pub fn new(channel: Arc<Channel>) -> Self {
        Self {
            channel,
            locations: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn locations(&self) -> Vec<String> {
        self.lock_locations().iter().cloned().collect()
    }

    /// Broadcasts one random reading for every subscribed location.
    pub fn broadcast_round(&self, rng: &mut impl Rng) -> usize {
        let locations = self.locations();
        for location in &locations {
            let report = MessageWeather {
                location: location.clone(),
                temperature: rng.random_range(0..MAX_TEMPERATURE),
            };
            if let Err(err) = WeatherBroadcast::broadcast(&self.channel, report) {
                tracing::error!("[WeatherPublisher] broadcast failed: {}", err);
            }
        }
        locations.len()
    }

    fn lock_locations(&self) -> MutexGuard<'_, BTreeSet<String>> {
        match self.locations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Service for WeatherService {
    const NAME: &'static str = "messaging.WeatherService";

    fn register_methods(self: Arc<Self>, registry: &mut MethodRegistryBuilder) {
        registry.register_fn::<SubscribeBroadcast, _>(move |request| {
            tracing::info!("[WeatherPublisher] adding subscription for {}", request.value);
            self.lock_locations().insert(request.value);
            Void
        });
    }
}

/// The subscriber's service: forwards every report it receives.
pub struct WeatherSubscriberService {
    reports: UnboundedSender<MessageWeather>,
}

impl WeatherSubscriberService {
    pub fn with_receiver() -> (Self, UnboundedReceiver<MessageWeather>) {
        let (reports, received) = mpsc::unbounded_channel();
        (Self { reports }, received)
    }
}

impl Service for WeatherSubscriberService {
    const NAME: &'static str = "messaging.WeatherSubscriberService";

    fn register_methods(self: Arc<Self>, registry: &mut MethodRegistryBuilder) {
        registry.register::<WeatherBroadcast, _>(move |report, _responder| {
            tracing::info!("[WeatherSubscriber] {:?}", report);
            let _ = self.reports.send(report);
        });
    }
}

/// Runs a publisher and one subscriber interested in `location`, and
/// returns the first `rounds` reports the subscriber received.
pub async fn run(
    broadcast_address: &SocketAddress,
    request_address: &SocketAddress,
    location: &str,
    rounds: usize,
    period: Duration,
) -> Result<Vec<MessageWeather>, DemoError> {
    let mut weather_service = None;
    let publisher = Publisher::bind(broadcast_address, request_address, |channel| {
        let service = Arc::new(WeatherService::new(channel));
        weather_service = Some(service.clone());
        service
    })
    .await?;
    let weather_service = weather_service.ok_or(DemoError::MissingResult("weather service"))?;

    let (subscriber_service, mut reports) = WeatherSubscriberService::with_receiver();
    let broadcast_address = publisher
        .broadcast_address()
        .cloned()
        .unwrap_or_else(|| broadcast_address.clone());
    let subscriber = Subscriber::connect(
        &broadcast_address,
        Some(publisher.request_address()),
        Arc::new(subscriber_service),
    )
    .await?;
    publisher.channel().wait_for_subscribers(1).await?;

    if let Some(requests) = subscriber.requests() {
        SubscribeBroadcast::call(requests, MessageString::new(location)).await?;
    }

    let mut received = Vec::with_capacity(rounds);
    let mut rng = StdRng::from_os_rng();
    while received.len() < rounds {
        weather_service.broadcast_round(&mut rng);
        tokio::time::sleep(period).await;
        while let Ok(report) = reports.try_recv() {
            received.push(report);
        }
    }
    received.truncate(rounds);

    Ok(received)
}
