use issuer_profiles::server;

#[tokio::main]
async fn main() {
    server::start().await;
}
