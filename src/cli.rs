use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "igdl")]
#[command(author, version, about = "Instagram media resolver with a streaming download proxy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the web server
    Serve {
        /// Port to listen on (defaults to WEB_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve an Instagram link and print its media resources
    Analyze {
        /// Instagram post, reel or IGTV link
        url: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
