#[actix_web::main]
async fn main() -> std::io::Result<()> {
    casewright_lib::run().await
}
