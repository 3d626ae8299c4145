//! `campus-cli`: the campus portal session core from a terminal.
//!
//! SYSTEM CONTEXT
//! ==============
//! Talks to the same REST backend as the browser client and keeps its tokens
//! in a state file instead of `localStorage`. Every command other than
//! `login` and `logout` rehydrates the saved session first and is then held
//! to the same role allow-lists as the matching portal pages.

mod store;
mod transport;


use std::path::PathBuf;
use std::time::Duration;

use campus::records::{
    self, AudienceFilter, DIRECTORY_VIEWERS, HodFilter, Member, MemberFilter, MemberStatus, NOTICE_EDITORS, NoticeDraft,
    NoticeFilter, SubjectFilter,
};
use campus::types::RecordId;
use campus::{
    Access, ApiClient, ApiConfig, ApiError, KeyValueStore, Role, RouteGuard, SessionError, SessionManager,
    Transport, UserProfile,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value, json};

use crate::store::FileStore;
use crate::transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not signed in; run `campus-cli login` first")]
    NotSignedIn,
    #[error("signed in as {role}, which is not allowed to run this command")]
    Forbidden { role: Role },
    #[error("{0}")]
    Invalid(&'static str),
    #[error("no home directory found; pass --state-file or set CAMPUS_STATE_FILE")]
    NoStateDir,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("state file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "campus-cli", about = "Campus portal API CLI")]
struct Cli {
    #[arg(long, env = "CAMPUS_API_URL", default_value = campus::config::DEFAULT_API_BASE_URL)]
    base_url: String,

    /// Where tokens and the cached user are kept between runs.
    #[arg(long, env = "CAMPUS_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Seconds to wait for the saved session to be revalidated.
    #[arg(long, env = "CAMPUS_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Log more (`-v` info, `-vv` debug). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CAMPUS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Notices(NoticesCommand),
    Syllabus(SyllabusCommand),
    Students(StudentsCommand),
    Staff(StaffCommand),
    Hods(HodsCommand),
}

#[derive(Args, Debug)]
struct NoticesCommand {
    #[command(subcommand)]
    command: NoticesSubcommand,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AudienceArg {
    All,
    Staff,
}

#[derive(Subcommand, Debug)]
enum NoticesSubcommand {
    List {
        #[arg(long)]
        category: Option<String>,
        /// Only honored for admin and staff.
        #[arg(long, value_enum, default_value_t = AudienceArg::All)]
        audience: AudienceArg,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum, default_value_t = AudienceArg::All)]
        audience: AudienceArg,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct SyllabusCommand {
    #[command(subcommand)]
    command: SyllabusSubcommand,
}

#[derive(Subcommand, Debug)]
enum SyllabusSubcommand {
    List {
        /// Ignored for students, who only see their own department.
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        semester: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    department: Option<String>,
    /// Staff only.
    #[arg(long)]
    designation: Option<String>,
    #[arg(long, value_parser = parse_status, default_value = "all")]
    status: MemberStatus,
    #[arg(long, default_value = "")]
    search: String,
}

/// Profile fields to change; omitted flags are left untouched.
#[derive(Args, Debug, Default)]
struct MemberEdits {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

impl MemberEdits {
    fn into_fields(self) -> Map<String, Value> {
        let edits = [
            ("email", self.email),
            ("first_name", self.first_name),
            ("last_name", self.last_name),
            ("department", self.department),
            ("phone", self.phone),
        ];
        edits
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key.to_owned(), Value::String(v.trim().to_owned()))))
            .collect()
    }
}

#[derive(Args, Debug)]
struct StudentsCommand {
    #[command(subcommand)]
    command: StudentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StudentsSubcommand {
    List(ListArgs),
    /// Edit a student by their student ID.
    Update {
        id: String,
        #[command(flatten)]
        edits: MemberEdits,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct StaffCommand {
    #[command(subcommand)]
    command: StaffSubcommand,
}

#[derive(Subcommand, Debug)]
enum StaffSubcommand {
    List(ListArgs),
    /// Edit a staff member by their staff ID.
    Update {
        id: String,
        #[command(flatten)]
        edits: MemberEdits,
        #[arg(long)]
        designation: Option<String>,
        #[arg(long)]
        salary: Option<f64>,
    },
    Delete {
        id: String,
    },
    /// Make a staff member head of a department. Takes the numeric user id.
    AssignHod {
        user_id: String,
        #[arg(long)]
        department: String,
        #[arg(long, default_value = "")]
        responsibilities: String,
    },
}

#[derive(Args, Debug)]
struct HodsCommand {
    #[command(subcommand)]
    command: HodsSubcommand,
}

#[derive(Subcommand, Debug)]
enum HodsSubcommand {
    List {
        #[arg(long)]
        department: Option<String>,
        #[arg(long, value_parser = parse_status, default_value = "all")]
        status: MemberStatus,
        #[arg(long, default_value = "")]
        search: String,
    },
}

fn parse_status(raw: &str) -> Result<MemberStatus, String> {
    MemberStatus::parse(raw).ok_or_else(|| format!("expected all, active or inactive, got `{raw}`"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let state_file = match cli.state_file {
        Some(path) => path,
        None => store::default_path().ok_or(CliError::NoStateDir)?,
    };
    let config = ApiConfig::new(cli.base_url).with_rehydrate_timeout(Duration::from_secs(cli.timeout_secs));
    let store = FileStore::open(state_file)?;
    tracing::debug!(path = %store.path().display(), "state file");

    let session = SessionManager::new(ApiClient::new(&config, ReqwestTransport::new()?, store));
    let output = run(&session, cli.command).await?;
    print_json(&output)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).with_target(false).init();
}

async fn run<T: Transport, S: KeyValueStore>(
    session: &SessionManager<T, S>,
    command: Command,
) -> Result<Value, CliError> {
    match command {
        Command::Login { email, password } => {
            let user = session.sign_in(&email, &password).await?;
            tracing::info!(role = %user.role, "signed in");
            Ok(json!({ "message": "Signed in", "user": user }))
        }
        Command::Logout => {
            session.logout();
            Ok(json!({ "message": "Signed out" }))
        }
        Command::Whoami => {
            let user = authorize(session, RouteGuard::any()).await?;
            Ok(serde_json::to_value(user)?)
        }
        Command::Notices(notices) => run_notices(session, notices.command).await,
        Command::Syllabus(syllabus) => run_syllabus(session, syllabus.command).await,
        Command::Students(students) => run_students(session, students.command).await,
        Command::Staff(staff) => run_staff(session, staff.command).await,
        Command::Hods(hods) => run_hods(session, hods.command).await,
    }
}

/// Rehydrate within the configured timeout and apply `guard`.
async fn authorize<T: Transport, S: KeyValueStore>(
    session: &SessionManager<T, S>,
    guard: RouteGuard,
) -> Result<UserProfile, CliError> {
    let timeout = session.api().config().rehydrate_timeout;
    let snapshot = session.rehydrate_within(tokio::time::sleep(timeout)).await;
    match guard.check(&snapshot) {
        Access::Granted => snapshot.user.ok_or(CliError::NotSignedIn),
        Access::RedirectToLanding => Err(snapshot.role().map_or(CliError::NotSignedIn, |role| CliError::Forbidden { role })),
        Access::Pending | Access::RedirectToLogin => Err(CliError::NotSignedIn),
    }
}

async fn run_notices<T: Transport, S: KeyValueStore>(
    session: &SessionManager<T, S>,
    command: NoticesSubcommand,
) -> Result<Value, CliError> {
    match command {
        NoticesSubcommand::List { category, audience } => {
            let user = authorize(session, RouteGuard::any()).await?;
            let notices = session.api().notices().await?;
            let audience = match audience {
                AudienceArg::All => AudienceFilter::Everyone,
                AudienceArg::Staff => AudienceFilter::StaffOnly,
            };
            let filter = NoticeFilter::default().with_category(category.as_deref().unwrap_or_default()).with_audience(audience);
            Ok(serde_json::to_value(records::filter_notices(&notices, Some(user.role), &filter))?)
        }
        NoticesSubcommand::Create { title, content, category, audience } => {
            authorize(session, RouteGuard::only(NOTICE_EDITORS)).await?;
            let audience = match audience {
                AudienceArg::All => records::Audience::All,
                AudienceArg::Staff => records::Audience::Staff,
            };
            let draft = NoticeDraft { title, content, category, audience, date: None, datetime: None }
                .validated()
                .map_err(CliError::Invalid)?;
            Ok(session.api().create_notice(&draft).await?)
        }
        NoticesSubcommand::Delete { id } => {
            authorize(session, RouteGuard::only(NOTICE_EDITORS)).await?;
            Ok(session.api().delete_notice(&RecordId::from(id.as_str())).await?)
        }
    }
}

async fn run_syllabus<T: Transport, S: KeyValueStore>(
    session: &SessionManager<T, S>,
    command: SyllabusSubcommand,
) -> Result<Value, CliError> {
    let SyllabusSubcommand::List { department, semester, search } = command;
    let user = authorize(session, RouteGuard::any()).await?;

    let (subjects, department) = if user.role == Role::Student {
        let own = user.student_department().ok_or(CliError::Invalid("No department on your student profile."))?;
        (session.api().department_subjects(own).await?, None)
    } else {
        (session.api().subjects().await?, department)
    };
    let filter = SubjectFilter { department, semester, search };
    Ok(serde_json::to_value(records::filter_subjects(&subjects, &filter))?)
}

fn list_members(members: &[Member], args: ListArgs) -> Result<Value, CliError> {
    let ListArgs { department, designation, status, search } = args;
    let filter = MemberFilter { department, designation, status, search };
    Ok(serde_json::to_value(records::filter_members(members, &filter))?)
}

fn edit_payload(fields: Map<String, Value>) -> Result<Value, CliError> {
    if fields.is_empty() {
        return Err(CliError::Invalid("Nothing to update; pass at least one field."));
    }
    Ok(Value::Object(fields))
}

async fn run_students<T: Transport, S: KeyValueStore>(
    session: &SessionManager<T, S>,
    command: StudentsSubcommand,
) -> Result<Value, CliError> {
    authorize(session, RouteGuard::only(DIRECTORY_VIEWERS)).await?;
    match command {
        StudentsSubcommand::List(args) => list_members(&session.api().students().await?, args),
        StudentsSubcommand::Update { id, edits } => {
            let payload = edit_payload(edits.into_fields())?;
            Ok(session.api().update_student(&id, &payload).await?)
        }
        StudentsSubcommand::Delete { id } => {
            session.api().delete_student(&id).await?;
            Ok(json!({ "message": "Student deleted successfully!" }))
        }
    }
}

async fn run_staff<T: Transport, S: KeyValueStore>(
    session: &SessionManager<T, S>,
    command: StaffSubcommand,
) -> Result<Value, CliError> {
    authorize(session, RouteGuard::only(DIRECTORY_VIEWERS)).await?;
    match command {
        StaffSubcommand::List(args) => list_members(&session.api().staff().await?, args),
        StaffSubcommand::Update { id, edits, designation, salary } => {
            let mut fields = edits.into_fields();
            if let Some(designation) = designation {
                fields.insert("designation".to_owned(), Value::String(designation.trim().to_owned()));
            }
            if let Some(salary) = salary {
                fields.insert("salary".to_owned(), Value::from(salary));
            }
            let payload = edit_payload(fields)?;
            Ok(session.api().update_staff(&id, &payload).await?)
        }
        StaffSubcommand::Delete { id } => {
            session.api().delete_staff(&id).await?;
            Ok(json!({ "message": "Staff member deleted successfully!" }))
        }
        StaffSubcommand::AssignHod { user_id, department, responsibilities } => {
            if department.trim().is_empty() {
                return Err(CliError::Invalid("A department is required."));
            }
            let user_id = RecordId::from(user_id.as_str());
            Ok(session.api().assign_hod(&user_id, &department, &responsibilities).await?)
        }
    }
}

async fn run_hods<T: Transport, S: KeyValueStore>(
    session: &SessionManager<T, S>,
    command: HodsSubcommand,
) -> Result<Value, CliError> {
    let HodsSubcommand::List { department, status, search } = command;
    authorize(session, RouteGuard::only(DIRECTORY_VIEWERS)).await?;
    let hods = session.api().hods().await?;
    let filter = HodFilter { department, status, search };
    Ok(serde_json::to_value(records::filter_hods(&hods, &filter))?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
