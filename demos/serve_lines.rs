//! Serve lines of the configured file. Reads one line index per line from stdin and answers
//! with a status code followed by the line.
//!
//! FILE_PATH_TO_SERVE=/path/to/file cargo run --example serve_lines

use async_std::{
    io::{self, BufReader},
    prelude::*,
};
use line_server::{Config, LineService};

#[async_std::main]
async fn main() -> line_server::Result<()> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::Builder::from_env(env).init();

    let config = Config::from_env()?;
    let service = LineService::new(&config);

    // Build the index once, before any request is answered
    service.prepare().await?;

    let mut requests = BufReader::new(io::stdin()).lines();
    while let Some(request) = requests.next().await {
        let request = request?;

        let line_index: usize = match request.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                println!("400 expected a non-negative line index");
                continue;
            }
        };

        match service.get_line(line_index).await {
            Ok(line) if line.ends_with('\n') => print!("200 {}", line),
            Ok(line) => println!("200 {}", line),
            Err(err) => println!("{}", err),
        }
    }

    Ok(())
}
