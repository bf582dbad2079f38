use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: u64,
    pub filename: String,
    pub mimetype: String,
    pub originalname: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// A photo whose file is already on disk but has no record yet.
#[derive(Clone, Debug)]
pub struct NewPhoto {
    pub filename: String,
    pub mimetype: String,
    pub originalname: String,
    pub size: u64,
}

impl NewPhoto {
    pub(crate) fn into_record(self, id: u64, created_at: DateTime<Utc>) -> PhotoRecord {
        PhotoRecord {
            id,
            filename: self.filename,
            mimetype: self.mimetype,
            originalname: self.originalname,
            size: self.size,
            created_at,
        }
    }
}
