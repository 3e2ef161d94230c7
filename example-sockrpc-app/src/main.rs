use example_sockrpc_app::{DemoError, hello, weather, word_count};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sockrpc_transport::EndpointConfig;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = EndpointConfig::default();
    let runtime = config.build_runtime()?;
    runtime.block_on(run_demos(config))?;
    Ok(())
}

async fn run_demos(config: EndpointConfig) -> Result<(), DemoError> {
    // One port per socket so a demo never races the teardown of the last one.
    let address = |offset: u16| config.clone().with_port(config.port + offset).address();

    let greeting = hello::run(&address(0), "Michael").await?;
    println!("[HelloClient]: Received from server: {}", greeting.value);

    let reports = weather::run(&address(1), &address(2), "Boston", 5, Duration::from_secs(1)).await?;
    for report in reports {
        println!("[WeatherSubscriber]: {} {}", report.location, report.temperature);
    }

    let mut rng = StdRng::from_os_rng();
    let documents: Vec<String> = (0..100)
        .map(|_| word_count::random_document(&mut rng))
        .collect();
    let total = word_count::run(
        &address(3),
        &address(4),
        &documents,
        word_count::DEFAULT_WORKER_COUNT,
    )
    .await?;
    println!("Total word count: {}", total);

    Ok(())
}
