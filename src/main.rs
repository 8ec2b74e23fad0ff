#[tokio::main]
async fn main() {
    velonix::start_server().await;
}
