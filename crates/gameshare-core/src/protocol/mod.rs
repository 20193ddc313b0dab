//! Wire format shared by the streaming and polling transports.
//!
//! Both transports carry the same JSON object per event; see
//! [`record::EventRecord`] for the schema and [`record::parse_record`] for the
//! parse + validate step.

pub mod record;
