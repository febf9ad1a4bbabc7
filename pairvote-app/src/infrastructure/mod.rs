pub mod db;
pub mod quota;
