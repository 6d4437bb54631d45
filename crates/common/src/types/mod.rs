use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Plain confirmation body, e.g. `{"message": "Entry deleted"}`.
#[derive(Serialize, Debug)]
pub struct Message {
    pub message: &'static str,
}
