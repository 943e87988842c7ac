//! In-memory contact directory.

use async_trait::async_trait;

use crate::error::LookupError;
use crate::model::Contact;
use crate::traits::ContactDirectory;

/// A `ContactDirectory` over a list already loaded by the caller.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContacts {
    contacts: Vec<Contact>,
}

impl InMemoryContacts {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }
}

#[async_trait]
impl ContactDirectory for InMemoryContacts {
    async fn contact(&self, id: &str) -> Result<Option<Contact>, LookupError> {
        Ok(self.contacts.iter().find(|contact| contact.id == id).cloned())
    }

    async fn find_by_name(&self, fragment: &str) -> Result<Vec<Contact>, LookupError> {
        Ok(self
            .contacts
            .iter()
            .filter(|contact| names_overlap(&contact.name, fragment))
            .cloned()
            .collect())
    }
}

/// Case-insensitive substring match in either direction.
///
/// Heuristic: two customers sharing a name fragment will collide.
pub fn names_overlap(name: &str, fragment: &str) -> bool {
    let name = name.trim().to_lowercase();
    let fragment = fragment.trim().to_lowercase();
    if name.is_empty() || fragment.is_empty() {
        return false;
    }
    name.contains(&fragment) || fragment.contains(&name)
}
