//! CLI command definitions

use crate::tools::{
    AdvancedSearchArgs, AnalyzeStackTraceArgs, GetQuestionArgs, SearchByErrorArgs,
    SearchByQueryArgs,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use stackgate_domain::OutputFormat;
use std::path::PathBuf;

/// Output format flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Readable Markdown
    Markdown,
    /// Pretty-printed JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for stackgate
#[derive(Parser, Debug)]
#[command(name = "stackgate")]
#[command(author, version, about = "Stack Overflow search tools for MCP hosts and the terminal")]
#[command(long_about = r#"
stackgate searches Stack Overflow through the Stack Exchange API.

Without a subcommand it serves its tools over MCP on stdin/stdout, ready to be
registered with an MCP host. The subcommands run the same tools once and print
the result.

Configuration is loaded from (lowest to highest priority):
1. ~/.config/stackgate/config.toml   Global config
2. ./stackgate.toml                  Project-level config
3. --config <path>                   Explicit config file
4. Environment: STACK_EXCHANGE_API_KEY, STACK_EXCHANGE_ACCESS_TOKEN,
   MAX_REQUESTS_PER_WINDOW, RATE_LIMIT_WINDOW_MS, RETRY_AFTER_MS and
   STACKGATE_<SECTION>__<KEY>

Example:
  stackgate
  stackgate search "async closure" -t rust
  stackgate error "TypeError: Cannot read properties of undefined" -l javascript -T react
  stackgate question 11227809 --format json
  cargo test 2>&1 | stackgate trace -l rust
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// The subcommand to run, `serve` when none was given
    pub fn effective_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the tools over MCP on stdio (default)
    Serve,
    /// Search questions by free-text query
    Search(SearchCommand),
    /// Search questions matching an error message
    Error(ErrorCommand),
    /// Show one question with its answers
    Question(QuestionCommand),
    /// Find questions related to a stack trace (read from a file or stdin)
    Trace(TraceCommand),
    /// Search with the full set of advanced filters
    Advanced(AdvancedCommand),
}

/// Flags shared by every one-shot subcommand
#[derive(Args, Debug, Clone, PartialEq)]
pub struct OutputArgs {
    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

impl OutputArgs {
    fn response_format(&self) -> Option<String> {
        self.format
            .map(|f| OutputFormat::from(f).as_str().to_string())
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SearchCommand {
    /// Search query
    pub query: String,

    /// Required tag (repeatable)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Minimum question score
    #[arg(long, allow_negative_numbers = true)]
    pub min_score: Option<i64>,

    /// Include comments
    #[arg(short, long)]
    pub comments: bool,

    /// Maximum number of questions
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl From<SearchCommand> for SearchByQueryArgs {
    fn from(cmd: SearchCommand) -> Self {
        Self {
            response_format: cmd.output.response_format(),
            query: cmd.query,
            tags: (!cmd.tags.is_empty()).then_some(cmd.tags),
            min_score: cmd.min_score,
            include_comments: Some(cmd.comments),
            limit: cmd.limit,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ErrorCommand {
    /// Error message
    pub message: String,

    /// Programming language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Related technology (repeatable)
    #[arg(short = 'T', long = "tech", value_name = "TECH")]
    pub technologies: Vec<String>,

    /// Minimum question score
    #[arg(long, allow_negative_numbers = true)]
    pub min_score: Option<i64>,

    /// Include comments
    #[arg(short, long)]
    pub comments: bool,

    /// Maximum number of questions
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl From<ErrorCommand> for SearchByErrorArgs {
    fn from(cmd: ErrorCommand) -> Self {
        Self {
            response_format: cmd.output.response_format(),
            error_message: cmd.message,
            language: cmd.language,
            technologies: (!cmd.technologies.is_empty()).then_some(cmd.technologies),
            min_score: cmd.min_score,
            include_comments: Some(cmd.comments),
            limit: cmd.limit,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct QuestionCommand {
    /// Question ID
    pub id: u64,

    /// Skip comments
    #[arg(long)]
    pub no_comments: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl From<QuestionCommand> for GetQuestionArgs {
    fn from(cmd: QuestionCommand) -> Self {
        Self {
            response_format: cmd.output.response_format(),
            question_id: cmd.id,
            include_comments: Some(!cmd.no_comments),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TraceCommand {
    /// File containing the stack trace; stdin when omitted
    pub file: Option<PathBuf>,

    /// Programming language of the trace
    #[arg(short, long)]
    pub language: String,

    /// Skip comments
    #[arg(long)]
    pub no_comments: bool,

    /// Maximum number of questions
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl TraceCommand {
    /// Tool arguments for a trace read from [`TraceCommand::file`] or stdin
    pub fn into_args(self, stack_trace: String) -> AnalyzeStackTraceArgs {
        AnalyzeStackTraceArgs {
            response_format: self.output.response_format(),
            stack_trace,
            language: self.language,
            include_comments: Some(!self.no_comments),
            limit: self.limit,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AdvancedCommand {
    /// Free-text query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Required tag (repeatable)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Excluded tag (repeatable)
    #[arg(long = "not-tag", value_name = "TAG")]
    pub not_tagged: Vec<String>,

    /// Text in the title
    #[arg(long)]
    pub title: Option<String>,

    /// Text in the body
    #[arg(long)]
    pub body: Option<String>,

    /// URL contained in the question
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub min_score: Option<i64>,

    #[arg(long)]
    pub min_answers: Option<u32>,

    #[arg(long)]
    pub min_views: Option<u64>,

    /// Only questions with (true) or without (false) an accepted answer
    #[arg(long)]
    pub accepted: Option<bool>,

    #[arg(long)]
    pub closed: Option<bool>,

    #[arg(long)]
    pub wiki: Option<bool>,

    #[arg(long)]
    pub migrated: Option<bool>,

    #[arg(long)]
    pub notice: Option<bool>,

    /// Owner user ID
    #[arg(long)]
    pub user: Option<u64>,

    /// Unix timestamp lower bound
    #[arg(long)]
    pub from_date: Option<i64>,

    /// Unix timestamp upper bound
    #[arg(long)]
    pub to_date: Option<i64>,

    /// activity, votes, creation or relevance
    #[arg(long)]
    pub sort: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub order: Option<String>,

    /// Include comments
    #[arg(short, long)]
    pub comments: bool,

    /// Maximum number of questions
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl From<AdvancedCommand> for AdvancedSearchArgs {
    fn from(cmd: AdvancedCommand) -> Self {
        Self {
            response_format: cmd.output.response_format(),
            query: cmd.query,
            tags: (!cmd.tags.is_empty()).then_some(cmd.tags),
            not_tagged: (!cmd.not_tagged.is_empty()).then_some(cmd.not_tagged),
            title: cmd.title,
            body: cmd.body,
            url: cmd.url,
            min_score: cmd.min_score,
            min_answers: cmd.min_answers,
            min_views: cmd.min_views,
            accepted: cmd.accepted,
            closed: cmd.closed,
            wiki: cmd.wiki,
            migrated: cmd.migrated,
            notice: cmd.notice,
            user: cmd.user,
            from_date: cmd.from_date,
            to_date: cmd.to_date,
            sort: cmd.sort,
            order: cmd.order,
            include_comments: Some(cmd.comments),
            limit: cmd.limit,
        }
    }
}
