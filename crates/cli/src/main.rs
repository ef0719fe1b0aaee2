use clap::Parser;
use mf_cli::Mf;

#[tokio::main]
async fn main() {
    let args = Mf::parse();
    std::process::exit(match args.run().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            1
        }
    })
}
