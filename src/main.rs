#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    visaprep_server::run().await
}
