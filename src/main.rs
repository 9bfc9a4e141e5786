use clap::{
    crate_description, crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command,
};
use ramfs_gen::Config;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML file with headers, blob prefix, ordering and exclude patterns")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("host-order")
                .long("host-order")
                .help("Keep the order in which the host lists directory entries instead of sorting by name")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the tree that would be embedded without writing the output file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("indir")
                .value_name("INDIR")
                .help("Directory whose contents are embedded")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("outfile")
                .value_name("OUTFILE")
                .help("C source file to generate")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("name")
                .value_name("NAME")
                .help("Name of the generated function that populates the RAM filesystem")
                .required(true),
        )
}

fn init_logging(is_verbose: bool) {
    let level = if is_verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(args: &ArgMatches) -> miette::Result<Config> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if args.get_flag("host-order") {
        config.sort = false;
    }

    Ok(config)
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(error) => {
            // usage errors exit with 1 rather than clap's default of 2
            let code = if error.use_stderr() { 1 } else { 0 };
            let _ = error.print();
            std::process::exit(code);
        }
    };

    init_logging(matches.get_flag("verbose"));

    let config = load_config(&matches)?;

    let input = matches.get_one::<PathBuf>("indir").expect("indir required");
    let output = matches
        .get_one::<PathBuf>("outfile")
        .expect("outfile required");
    let name = matches.get_one::<String>("name").expect("name required");

    if matches.get_flag("dry-run") {
        ramfs_gen::preview_image(input, name, &config)?;
    } else {
        ramfs_gen::generate_image(input, output, name, &config)?;
    }

    Ok(())
}
