pub mod http_client;

pub use http_client::{FormFields, HttpResponse, HttpTransport, ReqwestTransport};
