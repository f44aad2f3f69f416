//! Log in against a running backend and tail the group channel.
//!
//! ```sh
//! PLATINO_API_URL=http://localhost:8000 \
//! PLATINO_USER=ana PLATINO_PASSWORD=secret \
//! cargo run -p api-client --example chat_tail
//! ```

use std::sync::Arc;
use std::time::Duration;

use api_client::ApiClient;
use chat_engine::{ChannelKind, ChatEngine, ChatIdentity, PollIntervals};
use session::SessionStore;
use storage::Storage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let user = std::env::var("PLATINO_USER")?;
    let password = std::env::var("PLATINO_PASSWORD")?;

    let storage = Storage::in_memory();
    let session = Arc::new(SessionStore::new(storage.clone()));
    let client = ApiClient::from_env(session.clone())?;

    client.login(&user, &password).await?;
    let snapshot = session.snapshot();
    println!("logged in as {} (nivel {})", snapshot.usuario, snapshot.nivel);

    let identity = ChatIdentity::new(snapshot.usuario.clone(), snapshot.is_admin());
    let engine = ChatEngine::new(
        Arc::new(client),
        identity,
        &storage,
        PollIntervals::default(),
    );

    engine.open(ChannelKind::Group).await?;
    let mut printed = 0usize;
    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let state = engine.snapshot().await;
        for message in state.group.messages.iter().skip(printed) {
            println!("[{}] {}: {}", message.id, message.from_username, message.text);
        }
        printed = state.group.messages.len();
        if let Some(error) = state.window_error {
            eprintln!("chat error: {error}");
            break;
        }
    }

    engine.close().await;
    Ok(())
}
