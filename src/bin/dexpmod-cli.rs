#![forbid(unsafe_code)]
use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use dexpmod::{
    io,
    report::{selection_choices, ActivityListing, ShiftReport},
    shifter::{DateWindow, ShiftRequest, Shifter, SortOrder},
    storage::{JsonStorage, Storage},
    CourseId, Offset, Settings,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Décalage en masse des dates d'achèvement attendues
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du catalogue (cours + modules)
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: String,

    /// Réglages JSON (fuseau, formats, tri)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

/// Fenêtre de dates inclusive (timestamp, RFC3339 ou YYYY-MM-DD)
#[derive(Args, Debug)]
struct WindowArgs {
    #[arg(long, requires = "to", allow_hyphen_values = true)]
    from: Option<String>,
    #[arg(long, requires = "from", allow_hyphen_values = true)]
    to: Option<String>,
}

impl WindowArgs {
    fn window(&self) -> Result<Option<DateWindow>> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Ok(Some(io::parse_window(from, to)?)),
            _ => Ok(None),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des modules de cours depuis un CSV
    Import {
        #[arg(long)]
        csv: String,
    },

    /// Exporter le catalogue complet en JSON
    Export {
        #[arg(long)]
        out_json: String,
    },

    /// Lister les activités visibles et datées d'un cours
    List {
        #[arg(long)]
        course: i64,
        #[command(flatten)]
        window: WindowArgs,
        /// as-supplied | by-course | by-time
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher les activités proposées pour une sélection manuelle
    Choices {
        #[arg(long)]
        course: i64,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long)]
        sort: Option<String>,
    },

    /// Décaler les dates attendues
    Shift {
        #[arg(long)]
        course: i64,
        /// ex. 3600, 90m, -2w, "+3 days"
        #[arg(long, allow_hyphen_values = true)]
        offset: String,
        #[command(flatten)]
        window: WindowArgs,
        /// liste "id1,id2,..." (sélection manuelle)
        #[arg(long, conflicts_with_all = ["from", "to"])]
        select: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        report_csv: Option<String>,
        #[arg(long)]
        report_json: Option<String>,
    },
}

fn sort_order(raw: Option<String>, settings: &Settings) -> Result<SortOrder> {
    match raw {
        Some(s) => Ok(s.parse()?),
        None => Ok(settings.sort),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let storage = JsonStorage::open(&cli.catalog)?;
    let mut catalog = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::Import { csv } => {
            let modules = io::import_modules_csv(csv)?;
            let count = modules.len();
            for module in modules {
                catalog.upsert_module(module);
            }
            storage.save(&catalog)?;
            println!("Imported {count} module(s)");
            0
        }
        Commands::Export { out_json } => {
            io::export_catalog_json(&out_json, &catalog)?;
            println!("Catalog exported to {out_json}");
            0
        }
        Commands::List {
            course,
            window,
            sort,
            out_csv,
        } => {
            let course = CourseId::new(course);
            let sort = sort_order(sort, &settings)?;
            let shifter = Shifter::new(&catalog);
            let activities = shifter.list_qualifying(course, window.window()?, sort)?;
            let listing = ActivityListing::new(course, &activities, &settings.listing_formatter()?);
            if let Some(path) = out_csv {
                listing.export_csv(path)?;
            }
            if let Some(c) = catalog.find_course(course) {
                if !c.fullname.is_empty() {
                    println!("{}", c.fullname);
                }
            }
            print!("{}", listing.render_text());
            0
        }
        Commands::Choices {
            course,
            window,
            sort,
        } => {
            let course = CourseId::new(course);
            let sort = sort_order(sort, &settings)?;
            let shifter = Shifter::new(&catalog);
            let candidates = shifter.selection_candidates(course, window.window()?, sort)?;
            for choice in selection_choices(&candidates, &settings.listing_formatter()?) {
                println!("{} | {}", choice.id, choice.label);
            }
            0
        }
        Commands::Shift {
            course,
            offset,
            window,
            select,
            sort,
            report_csv,
            report_json,
        } => {
            let course = CourseId::new(course);
            let offset: Offset = offset.parse()?;
            let sort = sort_order(sort, &settings)?;
            let request = match (select, window.window()?) {
                (Some(ids), _) => ShiftRequest::selected(offset, io::parse_id_list(&ids)?),
                (None, Some(w)) => ShiftRequest::within(offset, w),
                (None, None) => ShiftRequest::all(offset),
            };

            let moved = {
                let mut shifter = Shifter::new(&mut catalog);
                shifter.compute_shift(course, &request, sort)?
            };
            storage.save(&catalog)?;

            let report = ShiftReport::new(
                course,
                offset,
                &moved,
                &settings.result_formatter()?,
                Utc::now(),
            );
            if let Some(path) = report_csv {
                report.export_csv(path)?;
            }
            if let Some(path) = report_json {
                report.export_json(path)?;
            }
            if report.is_empty() {
                eprintln!("No activity moved");
                // Code 2 = rien à décaler
                2
            } else {
                print!("{}", report.render_text());
                0
            }
        }
    };

    std::process::exit(code);
}
