// ── Domain model ──
//
// API-facing representations of the three entities. These are the shapes
// serialized on the HTTP surface; the persisted shapes live in `store`.

pub mod answer;
pub mod detail;
pub mod record;
pub mod record_type;

pub use answer::{Answer, parse_answers};
pub use detail::Detail;
pub use record::Record;
pub use record_type::RecordType;
