use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mucat::configuration::{create_config, ConfigFolder};
use mucat::startup::{self, Lookup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Command::new("mucat")
        .about("🎵 Artist, album and track lookups with a local cache 🎵")
        .subcommand(
            Command::new("artist")
                .about("💿 Albums and tracks of an artist")
                .arg(name_arg("Artist name"))
                .arg(limit_arg())
                .arg(
                    Arg::new("page")
                        .long("page")
                        .help("Show only this page of albums (starts at 1)")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("page_size")
                        .long("page-size")
                        .help("Albums per page")
                        .value_parser(value_parser!(usize)),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("albums")
                .about("💿 Search albums by title")
                .arg(name_arg("Album title"))
                .arg(limit_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("tracks")
                .about("🎶 Search tracks by name")
                .arg(name_arg("Track name"))
                .arg(limit_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("album-tracks")
                .about("🎶 Tracks of an album by its id")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .help("Album id")
                        .value_parser(value_parser!(u64)),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("lyrics")
                .about("📜 Lyrics of a song")
                .arg(Arg::new("artist").required(true).help("Artist name"))
                .arg(Arg::new("song").required(true).help("Song title"))
                .arg(json_arg()),
        )
        .subcommand(Command::new("serve").about("🚀 Run the HTTP API"))
        .subcommand(Command::new("cache").about("🗂️ List cached artist records"))
        .subcommand(Command::new("config").about("🛠️ Create or update configuration file for mucat"))
        .get_matches();

    let cfg_folder = ConfigFolder::new();

    match args.subcommand() {
        Some(("config", _)) => {
            println!("\x1b[1m\x1b[34mConfiguring mucat...\x1b[0m");
            create_config(cfg_folder)
        }
        Some(("serve", _)) => {
            startup::init_tracing();
            startup::serve(cfg_folder).await
        }
        Some(("cache", _)) => {
            startup::init_tracing();
            startup::list_cache(cfg_folder)
        }
        Some((name, sub)) => match parse_lookup(name, sub) {
            Some(lookup) => {
                startup::init_tracing();
                startup::run_lookup(cfg_folder, lookup, sub.get_flag("json")).await
            }
            None => {
                print_usage();
                Ok(())
            }
        },
        None => {
            print_usage();
            Ok(())
        }
    }
}

fn parse_lookup(command: &str, sub: &ArgMatches) -> Option<Lookup> {
    let name = || {
        sub.get_many::<String>("name")
            .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
    };
    let limit = sub.try_get_one::<usize>("limit").ok().flatten().copied();

    match command {
        "artist" => Some(Lookup::Artist {
            name: name(),
            limit,
            page: sub.get_one::<usize>("page").copied(),
            page_size: sub.get_one::<usize>("page_size").copied(),
        }),
        "albums" => Some(Lookup::Albums {
            name: name(),
            limit,
        }),
        "tracks" => Some(Lookup::Tracks {
            name: name(),
            limit,
        }),
        "album-tracks" => sub
            .get_one::<u64>("id")
            .map(|&album_id| Lookup::AlbumTracks { album_id }),
        "lyrics" => Some(Lookup::Lyrics {
            artist: sub.get_one::<String>("artist")?.clone(),
            song: sub.get_one::<String>("song")?.clone(),
        }),
        _ => None,
    }
}

fn name_arg(help: &'static str) -> Arg {
    Arg::new("name").required(true).num_args(1..).help(help)
}

fn limit_arg() -> Arg {
    Arg::new("limit")
        .short('l')
        .long("limit")
        .help("Maximum number of results to fetch")
        .value_parser(value_parser!(usize))
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print the result as JSON")
        .action(ArgAction::SetTrue)
}

fn print_usage() {
    println!("\x1b[1m\x1b[31mInvalid command!\x1b[0m\n");
    println!("📖 Available Commands:");
    println!("  \x1b[1m\x1b[32mmucat artist <name>\x1b[0m       - 💿 Albums and tracks of an artist");
    println!("  \x1b[1m\x1b[32mmucat albums <title>\x1b[0m      - 💿 Search albums by title");
    println!("  \x1b[1m\x1b[32mmucat tracks <name>\x1b[0m       - 🎶 Search tracks by name");
    println!("  \x1b[1m\x1b[32mmucat album-tracks <id>\x1b[0m   - 🎶 Tracks of an album");
    println!("  \x1b[1m\x1b[32mmucat lyrics <artist> <song>\x1b[0m - 📜 Lyrics of a song");
    println!("  \x1b[1m\x1b[32mmucat serve\x1b[0m               - 🚀 Run the HTTP API");
    println!("  \x1b[1m\x1b[32mmucat cache\x1b[0m               - 🗂️  List cached artists");
    println!("  \x1b[1m\x1b[32mmucat config\x1b[0m              - 🛠️  Create or update configuration file");
    println!("\x1b[33mRun any command with --help for its options.\x1b[0m\n");
}
