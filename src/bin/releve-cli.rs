#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use releve::{
    filter::{Category, FilterConfig},
    io,
    model::{Identity, NurseId, NurseIdentity, Role, ShiftCode, ShiftSwapRequest},
    rules::{load_rule_table_from_file, RuleTable},
    schedule::ScheduleSnapshot,
    storage::{snapshot_around, JsonRequestFile, JsonScheduleDir, RequestSource},
    swap::{
        can_delete, check_acceptable, check_swap, delete_action, resolve_display_status,
        DisplayStatus,
    },
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI du moteur d'échanges de gardes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des demandes (export backend)
    #[arg(long, global = true, default_value = "requests.json")]
    requests: String,

    /// Répertoire des plannings mensuels (AAAA-MM.json)
    #[arg(long, global = true, default_value = "schedules")]
    schedules: String,

    /// Table de repos personnalisée (JSON)
    #[arg(long, global = true)]
    rules: Option<String>,

    /// Date du jour AAAA-MM-JJ (défaut : date locale)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Utilisateur courant
    #[arg(long, global = true)]
    as_id: Option<String>,
    #[arg(long, global = true, default_value = "staff")]
    as_role: String,
    #[arg(long, global = true, default_value = "")]
    as_identity: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lister les demandes filtrées, triées et paginées
    List {
        #[arg(long)]
        search: Option<String>,
        /// statuts masqués "expired,cancelled,..."
        #[arg(long, value_delimiter = ',')]
        hide: Vec<DisplayStatus>,
        /// all | shift | mission | overtime
        #[arg(long, default_value = "all")]
        tab: Category,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// gardes d'origine autorisées "N,A,..."
        #[arg(long, value_delimiter = ',')]
        shift: Vec<ShiftCode>,
        #[arg(long)]
        requestor: Option<String>,
        /// seulement les demandeurs de même spécialité
        #[arg(long)]
        same_identity: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Statut et actions possibles sur une demande
    Show {
        #[arg(long)]
        id: String,
    },

    /// Vérifier qu'une garde peut être posée (repos minimal)
    Check {
        #[arg(long)]
        nurse: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        shift: ShiftCode,
        /// modification provisoire "AAAA-MM-JJ:infirmière:CODE" (répétable)
        #[arg(long = "override")]
        overrides: Vec<String>,
    },

    /// Vérifier un échange de gardes pour les deux infirmières
    CheckSwap {
        #[arg(long)]
        id: String,
        #[arg(long)]
        acceptor: String,
        #[arg(long = "override")]
        overrides: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let user = cli.as_id.as_deref().map(|id| {
        NurseIdentity::new(
            NurseId::new(id),
            Role::parse(&cli.as_role),
            Identity::parse(&cli.as_identity),
        )
    });
    let custom_rules = cli
        .rules
        .as_deref()
        .map(load_rule_table_from_file)
        .transpose()?;
    let rules = custom_rules.as_ref().unwrap_or(RuleTable::standard());

    let code = match cli.cmd {
        Commands::List {
            search,
            hide,
            tab,
            from,
            to,
            shift,
            requestor,
            same_identity,
            page,
            out_csv,
        } => {
            let requests = JsonRequestFile::open(&cli.requests)?.load()?;
            let user = user.unwrap_or_else(|| {
                NurseIdentity::new(NurseId::new(""), Role::Staff, Identity::default())
            });
            let config = FilterConfig::new()
                .with_search(search.unwrap_or_default())
                .with_hidden_statuses(hide)
                .with_category(tab)
                .with_date_range(from, to)
                .with_shifts(shift)
                .with_requestor(requestor.map(NurseId::new))
                .with_same_identity(same_identity)
                .with_page(page);

            let filtered = config.apply(&requests, &user, today);
            if let Some(path) = out_csv {
                io::export_requests_csv(path, &filtered, today)?;
            }
            let listing = config.page_of(filtered);
            for r in &listing.items {
                print_row(r, today);
            }
            println!(
                "page {}/{} | {} request(s) | {} active filter(s)",
                listing.number,
                listing.page_count,
                listing.total,
                config.active_filter_count()
            );
            0
        }
        Commands::Show { id } => {
            let requests = JsonRequestFile::open(&cli.requests)?.load()?;
            let request = find_request(&requests, &id)?;
            let Some(user) = user else {
                bail!("--as-id is required to evaluate actions");
            };
            println!("id: {}", request.id);
            println!("status: {}", resolve_display_status(request, today));
            match check_acceptable(request, &user, today) {
                Ok(()) => println!("accept: yes"),
                Err(refusal) => println!("accept: no ({refusal})"),
            }
            if can_delete(request, &user, today) {
                println!("delete: allowed ({})", delete_action(request, &user));
            } else {
                println!("delete: not allowed");
            }
            0
        }
        Commands::Check {
            nurse,
            date,
            shift,
            overrides,
        } => {
            let provider = JsonScheduleDir::new(&cli.schedules);
            let snapshot = snapshot_around(&provider, date)?;
            let overrides = parse_overrides(&overrides)?;
            match rules.check(&snapshot, date, shift, &NurseId::new(&nurse), &overrides) {
                Ok(()) => {
                    println!("OK: {nurse} can work {shift} on {date}");
                    0
                }
                Err(reason) => {
                    eprintln!("INVALID: {reason}");
                    2
                }
            }
        }
        Commands::CheckSwap {
            id,
            acceptor,
            overrides,
        } => {
            let requests = JsonRequestFile::open(&cli.requests)?.load()?;
            let request = find_request(&requests, &id)?;
            let snapshot = match request.from_date {
                Some(date) => snapshot_around(&JsonScheduleDir::new(&cli.schedules), date)?,
                None => ScheduleSnapshot::new(),
            };
            let overrides = parse_overrides(&overrides)?;
            match check_swap(rules, &snapshot, request, &NurseId::new(&acceptor), &overrides) {
                Ok(()) => {
                    println!("OK: swap {id} is compatible for both nurses");
                    0
                }
                Err(err) => {
                    eprintln!("INVALID: {err}");
                    // Code 2 = WARNING/INCOMPLETE
                    2
                }
            }
        }
    };

    std::process::exit(code);
}

fn find_request<'a>(requests: &'a [ShiftSwapRequest], id: &str) -> Result<&'a ShiftSwapRequest> {
    requests
        .iter()
        .find(|r| r.id.as_str() == id)
        .with_context(|| format!("unknown request: {id}"))
}

fn parse_overrides(raw: &[String]) -> Result<ScheduleSnapshot> {
    let mut overrides = ScheduleSnapshot::new();
    for entry in raw {
        let (date, nurse, code) = io::parse_override(entry)?;
        overrides.insert(date, nurse, code);
    }
    Ok(overrides)
}

fn print_row(r: &ShiftSwapRequest, today: NaiveDate) {
    let (from, to) = r.detail.labels();
    println!(
        "{} | {} | {} {} → {} | {} | {}",
        r.id,
        r.from_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
        r.swap_type().as_str(),
        from.as_deref().unwrap_or("-"),
        to.as_deref().unwrap_or("-"),
        resolve_display_status(r, today),
        r.requestor_name().unwrap_or("-")
    );
}
