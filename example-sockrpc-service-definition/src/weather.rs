use crate::{MessageString, MessageWeather, Void};
use sockrpc_service::rpc_method;

rpc_method!(
    /// Asks a weather publisher to start reporting on a location.
    pub SubscribeBroadcast,
    "messaging.WeatherService.SubscribeBroadcast",
    MessageString => Void
);

rpc_method!(
    /// One weather report, broadcast to every subscriber.
    pub WeatherBroadcast,
    "messaging.WeatherSubscriberService.WeatherBroadcast",
    MessageWeather => Void
);
