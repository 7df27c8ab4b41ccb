//! Hello world client.
//!
//! Connects to a store, sets key "hello" with value "world", and reads it
//! back. Run against a compatible store listening on 127.0.0.1:6379:
//!
//!     cargo run --example hello

use kvlink::client::Client;
use kvlink::result::Outcome;

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = Client::connect("127.0.0.1:6379", &[]).await?;

    // Set the key "hello" with value "world"
    let status = client.set("hello", "world", None).await;
    if let Some(err) = status.err() {
        eprintln!("set failed: {}", err);
        return Ok(());
    }
    println!("set status: {:?}", status.message());

    // Get key "hello"
    let value = client.get("hello", None).await;
    println!("got value: {:?}", value.value());

    Ok(())
}
