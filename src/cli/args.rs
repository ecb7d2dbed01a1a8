use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "compboard",
    version,
    about = "compensation offer dashboard",
    long_about = "compboard loads a dataset of self-reported compensation offers, cleans it, and prints dashboard views: summary cards, chart series, a paginated offer table and a side-by-side comparison.\n\nExamples:\n  compboard -d ./data/parsed_comps.json\n  compboard -d ./data/parsed_comps.json --company google --salary 20-80 --page 2\n  compboard -d https://example.com/parsed_comps.json --compare 12,57 --export compare.json\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'd',
        long = "data",
        value_name = "FILE|URL",
        help_heading = "Input",
        help = "Offer dataset: a JSON file path or an http(s) URL."
    )]
    pub data: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.compboard/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Input",
        help = "HTTP timeout in seconds for URL data sources."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "yp",
        visible_alias = "yoe-policy",
        value_name = "POLICY",
        help_heading = "Validation",
        help = "How yoe is validated: truthy (0 rejected) or numeric."
    )]
    pub yoe_policy: Option<String>,

    #[arg(
        long = "amr",
        visible_alias = "allow-missing-mapped-role",
        help_heading = "Validation",
        help = "Accept records without a mapped_role."
    )]
    pub allow_missing_mapped_role: bool,

    #[arg(
        short = 's',
        long = "q",
        visible_alias = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Free-text search over company, role, mapped role and location."
    )]
    pub search: Option<String>,

    #[arg(
        long = "co",
        visible_alias = "company",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Company contains TEXT (case-insensitive)."
    )]
    pub company: Option<String>,

    #[arg(
        long = "loc",
        visible_alias = "location",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Location contains TEXT (case-insensitive)."
    )]
    pub location: Option<String>,

    #[arg(
        long = "ro",
        visible_alias = "role",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Mapped role contains TEXT (case-insensitive)."
    )]
    pub role: Option<String>,

    #[arg(
        short = 'y',
        long = "yr",
        visible_alias = "yoe",
        value_name = "MIN-MAX",
        help_heading = "Filters",
        help = "Years of experience range (default 0-30)."
    )]
    pub yoe: Option<String>,

    #[arg(
        short = 'S',
        long = "sal",
        visible_alias = "salary",
        value_name = "MIN-MAX",
        help_heading = "Filters",
        help = "Total compensation range in lakhs (default 1-200)."
    )]
    pub salary: Option<String>,

    #[arg(
        short = 'i',
        long = "wie",
        visible_alias = "with-interview-exp",
        help_heading = "Filters",
        help = "Only offers that link an interview experience write-up."
    )]
    pub with_interview_exp: bool,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Table",
        help = "Page of the offer table to show (1-based, clamped)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'z',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Table",
        help = "Rows per page (default 10)."
    )]
    pub page_size: Option<usize>,

    #[arg(
        short = 'm',
        long = "cmp",
        visible_alias = "compare",
        value_name = "IDS",
        help_heading = "Comparison",
        help = "Offer ids to compare side by side (comma-separated, up to 5)."
    )]
    pub compare: Option<String>,

    #[arg(
        short = 'e',
        long = "exp",
        visible_alias = "export",
        value_name = "FILE",
        help_heading = "Comparison",
        help = "Write the comparison snapshot as JSON to FILE."
    )]
    pub export: Option<String>,

    #[arg(
        long = "ob",
        visible_alias = "overflow-bucket",
        help_heading = "Charts",
        help = "Count totals above 200 in a \"200+\" histogram bucket."
    )]
    pub overflow_bucket: bool,

    #[arg(
        long = "sg",
        visible_alias = "suggest",
        value_name = "FIELD:QUERY",
        help_heading = "Lookup",
        help = "Autosuggest values (fields: company, location, role, interview-company, interview-role, experience, tech)."
    )]
    pub suggest: Option<String>,

    #[arg(
        long = "iv",
        visible_alias = "interviews",
        help_heading = "Lookup",
        help = "List offers with interview experience write-ups."
    )]
    pub interviews: bool,

    #[arg(
        long = "lu",
        visible_alias = "last-updated",
        help_heading = "Lookup",
        help = "Look up when the dataset was last updated."
    )]
    pub last_updated: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the dashboard report to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json)."
    )]
    pub output_format: Option<String>,
}
