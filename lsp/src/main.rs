mod server;

#[cfg(test)]
mod heptc_test;
#[cfg(test)]
mod loader_test;
#[cfg(test)]
mod text_test;

#[tokio::main]
async fn main() {
    server::run().await;
}
