pub mod bson_json;
pub mod http_helpers;
pub mod logger;
