use clap::{Args, Parser as ClapParser, Subcommand};
use harvest_osm::cli::{self, CliError, QueryOptions, QueryOutput};
use harvest_osm::output::{OutFormat, OutVerbosity, OutputSettings};
use harvest_osm::{ElementKind, Representation};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "harvest")]
#[command(about = "Harvest - build Overpass QL queries from tag filters and areas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the query for one element kind, tag filter and area
    Query(QueryArgs),
}

#[derive(Args)]
struct QueryArgs {
    /// Element kind: node, way, rel or nwr
    #[arg(short, long, default_value = "nwr")]
    kind: String,

    /// Tag filter, e.g. "highway,surface=gravel"
    #[arg(short, long, default_value = "")]
    tags: String,

    /// Set name of the main statement
    #[arg(short, long)]
    name: Option<String>,

    /// Bounding box "south,west,north,east"
    #[arg(long, allow_hyphen_values = true)]
    bbox: Option<String>,

    /// Polygon "lat lon lat lon ..."
    #[arg(long, allow_hyphen_values = true)]
    coords: Option<String>,

    /// GeoJSON file holding a polygon (reads stdin if no area is given)
    #[arg(long)]
    shape: Option<String>,

    /// Subtract elements carrying these tags
    #[arg(long)]
    exclude: Option<String>,

    /// Recurse with one of > >> < <<
    #[arg(long)]
    recurse: Option<String>,

    /// Area encoding: bbox or poly
    #[arg(long)]
    area_format: Option<String>,

    /// Output format header: json or xml
    #[arg(long)]
    format: Option<String>,

    /// Server timeout in seconds
    #[arg(long)]
    timeout: Option<u32>,

    /// Closing out statement: ids, skel, body, tags or meta
    #[arg(long)]
    out: Option<String>,

    /// Request geometry in the closing out statement
    #[arg(long)]
    geom: bool,

    /// Print the statement structure as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    cli::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query(args) => args.into_options().and_then(|options| run_query(&options)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn parse_choice<T>(
    value: Option<String>,
    what: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, CliError> {
    value
        .map(|s| parse(&s).ok_or(CliError::UnknownValue { what, value: s.clone() }))
        .transpose()
}

impl QueryArgs {
    fn into_options(self) -> Result<QueryOptions, CliError> {
        let kind = ElementKind::from_keyword(&self.kind).ok_or_else(|| CliError::UnknownValue {
            what: "element kind",
            value: self.kind.clone(),
        })?;
        let representation =
            parse_choice(self.area_format, "area format", Representation::from_name)?;
        let format = parse_choice(self.format, "output format", OutFormat::from_name)?;
        let out = parse_choice(self.out, "out verbosity", OutVerbosity::from_name)?;

        let shape = match self.shape {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None if self.bbox.is_none()
                && self.coords.is_none()
                && !atty::is(atty::Stream::Stdin) =>
            {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                Some(buffer)
            }
            None => None,
        };

        Ok(QueryOptions {
            kind,
            tags: self.tags,
            name: self.name,
            bbox: self.bbox,
            coords: self.coords,
            shape,
            exclude: self.exclude,
            recurse: self.recurse,
            representation,
            settings: OutputSettings {
                format,
                timeout: self.timeout,
                out,
                geometry: self.geom,
            },
            json: self.json,
        })
    }
}

fn run_query(options: &QueryOptions) -> Result<(), CliError> {
    match cli::execute_query(options)? {
        QueryOutput::Query(text) | QueryOutput::Json(text) => println!("{}", text),
    }
    Ok(())
}
