use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let management_port =
        std::env::var("MANAGEMENT_PORT").unwrap_or_else(|_| "8081".to_string());
    let inference_port = std::env::var("INFERENCE_PORT").unwrap_or_else(|_| "8080".to_string());

    let management_addr = format!("127.0.0.1:{management_port}");
    let inference_addr = format!("127.0.0.1:{inference_port}");
    let management = TcpListener::bind(&management_addr).await?;
    let inference = TcpListener::bind(&inference_addr).await?;
    println!("management API on {management_addr}, inference API on {inference_addr}");
    mock_server::run(management, inference).await
}
