mod local;
mod remote;
mod youtube;

pub use local::{
    FileSource, LocalResourceTable, ResourceRef, ResourceRegistry, SelectedFile, global_table,
    is_supported_file,
};
pub use remote::{StreamKind, encode_query_value, proxied_url};
pub use youtube::{embed_url, extract_youtube_id, is_youtube_url};
