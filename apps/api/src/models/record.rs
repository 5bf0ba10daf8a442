use serde::ser::{Serialize, SerializeMap, Serializer};

pub const FIELD_ID: &str = "ID";
pub const FIELD_CATEGORY: &str = "Category";
pub const FIELD_TITLE: &str = "Title";
pub const FIELD_COMPANY: &str = "Company";
pub const FIELD_DESCRIPTION: &str = "Description";
pub const FIELD_SALARY: &str = "Salary";

/// Field names every created listing carries. The free-form extra field may not reuse them.
pub const CORE_FIELDS: [&str; 6] = [
    FIELD_ID,
    FIELD_TITLE,
    FIELD_CATEGORY,
    FIELD_COMPANY,
    FIELD_DESCRIPTION,
    FIELD_SALARY,
];

/// One job listing: an ordered mapping from field name to value.
///
/// The field set is open. Besides `ID` and `Category` a listing usually carries
/// `Title`, `Company`, `Description`, `Salary` and one employer-named extra field.
/// Inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self) -> &str {
        self.get(FIELD_ID).unwrap_or_default()
    }

    /// `ID` read as a number. Listings whose ID is not numeric never match a lookup.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id().parse().ok()
    }

    pub fn category(&self) -> &str {
        self.get(FIELD_CATEGORY).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Mapping equality: field order does not matter.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(n, v)| other.get(n) == Some(v))
    }
}

impl Eq for Record {}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// A listing submitted by an employer, before the store assigns it an ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub category: String,
    pub company: String,
    pub description: String,
    pub salary: String,
    /// Employer-named extra field, already capitalized.
    pub extra: Option<(String, String)>,
}

impl NewJob {
    /// Builds the stored record in creation order:
    /// `ID, Title, Category, Company, Description, Salary, <extra>`.
    pub fn into_record(self, id: String) -> Record {
        let mut record = Record::new();
        record.insert(FIELD_ID, id);
        record.insert(FIELD_TITLE, self.title);
        record.insert(FIELD_CATEGORY, self.category);
        record.insert(FIELD_COMPANY, self.company);
        record.insert(FIELD_DESCRIPTION, self.description);
        record.insert(FIELD_SALARY, self.salary);
        if let Some((label, value)) = self.extra {
            record.insert(label, value);
        }
        record
    }
}
