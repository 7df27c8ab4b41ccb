//! Ping client.
//!
//! A simple client that connects to a store and says `ping`. Run against
//! a compatible store listening on 127.0.0.1:6379:
//!
//!     cargo run --example ping

use kvlink::client::Client;
use kvlink::result::Outcome;

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = Client::connect("127.0.0.1:6379", &[]).await?;

    let result = client.ping(None, None).await;
    println!("empty ping response: {:?}", result.value());

    let result = client.ping(Some("hello"), None).await;
    println!("echo ping response: {:?}", result.value());

    if let Some(err) = result.err() {
        eprintln!("ping failed: {}", err);
    }

    Ok(())
}
