// ── Entity lifecycle operations ──
//
// find / create / upsert / delete for each entity, expressed as inherent
// methods taking an `OpContext`. Record creation is "create, then find on a
// duplicate key"; answer and detail creation is "find, then create on not
// found".

mod answer;
mod detail;
mod record;
