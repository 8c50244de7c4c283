use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("fullfeed")
        .version(env!("CARGO_PKG_VERSION"))
        .author("fullfeed contributors")
        .about("Full-text RSS for link aggregators")
        .arg(clap::arg!([INPUT] "Feed URL, local feed file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-j --concurrency <N> "Maximum number of pages fetched at once").default_value("8"))
        .arg(
            clap::arg!(--"cache-dir" <DIR> "Directory for cached page fragments")
                .value_name("DIR")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--"no-cache" "Do not read or write the fragment cache"))
        .arg(clap::arg!(--page "Treat INPUT as a single HTML page and print its main content"))
        .arg(clap::arg!(--"base-url" <URL> "Source URL for file or stdin input").value_name("URL"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "fullfeed", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "fullfeed", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "fullfeed", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "fullfeed", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
