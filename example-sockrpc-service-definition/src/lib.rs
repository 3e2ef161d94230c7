mod echo;
pub use echo::Echo;

mod hello;
pub use hello::SayHello;

mod messages;
pub use messages::{MessageCount, MessageString, MessageWeather, Void};

mod task_queue;
pub use task_queue::{StringLength, WordCount};

mod weather;
pub use weather::{SubscribeBroadcast, WeatherBroadcast};
