//! The ownership policy: only a record's creator may change or remove it.

use uuid::Uuid;

use crate::{Error, Record, Resource, Result};

/// Succeeds when `requester` owns `record`; otherwise [`Error::NotOwner`].
///
/// Pure check. Callers run it after the record has been found and before the
/// store is asked to write, so a failure leaves the record untouched.
pub fn require_owner<R: Resource>(requester: Uuid, record: &Record<R>) -> Result<()> {
  if record.owner == requester {
    Ok(())
  } else {
    Err(Error::NotOwner {
      requester,
      collection: R::COLLECTION,
      id: record.id,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::school::School;

  fn school_owned_by(owner: Uuid) -> Record<School> {
    let now = Utc::now();
    Record {
      id: Uuid::new_v4(),
      owner,
      created_at: now,
      updated_at: now,
      body: School {
        name:          "Hogwarts".into(),
        location:      "Scotland".into(),
        administrator: "Dumbledore".into(),
      },
    }
  }

  #[test]
  fn owner_passes() {
    let owner = Uuid::new_v4();
    assert!(require_owner(owner, &school_owned_by(owner)).is_ok());
  }

  #[test]
  fn stranger_is_rejected() {
    let record = school_owned_by(Uuid::new_v4());
    let stranger = Uuid::new_v4();
    match require_owner(stranger, &record) {
      Err(Error::NotOwner { requester, collection, id }) => {
        assert_eq!(requester, stranger);
        assert_eq!(collection, crate::Collection::Schools);
        assert_eq!(id, record.id);
      }
      other => panic!("expected NotOwner, got {other:?}"),
    }
  }
}
