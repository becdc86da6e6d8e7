//! Apexlogs engine: credential resolution, tooling queries, log lookup,
//! download-link resolution, table detection and page watching.
mod credential;
mod detect;
mod download;
mod lookup;
mod page;
mod query;
mod runtime;
mod store;
mod types;
mod watch;

pub use credential::{sibling_origins, Credential, CredentialResolver, CredentialStore};
pub use detect::{locate_jobs_table, ScannedRow, TableScan};
pub use download::{
    console_download_url, format_bytes, link_label, my_domain_origin, DownloadLink,
    DownloadResolver, ResolvedLink,
};
pub use lookup::{is_well_formed_job_id, LogLookup, LookupError};
pub use page::{
    decode_page, FetchedPage, PageFetchError, PageFetcher, PageSettings, ReqwestPageFetcher,
};
pub use query::{QueryError, ToolingClient, ToolingConfig, DEFAULT_API_VERSION};
pub use runtime::{LookupEvent, LookupHandle};
pub use store::{ensure_download_dir, LogStore, StoreError};
pub use types::{JobRecord, LogRecord};
pub use watch::{PageEvent, PageWatcher};
