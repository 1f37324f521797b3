#[tokio::main]
async fn main() {
    tantrums_lsp::run().await;
}
