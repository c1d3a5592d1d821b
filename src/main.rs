#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    leave_report_server::run().await
}
