/// How a whitelisted field is compared against the caller's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Exact match on the typed value
    Equals,
    /// Case-insensitive substring match
    Contains,
}

/// Value type of a filterable column, used to coerce query-string input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Uuid,
    Text,
    Bool,
    Timestamp,
    /// Text restricted to the listed values
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FilterField {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type }
    }
}

/// A set of fields sharing one match kind, optionally scoped to a relation.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub kind: MatchKind,
    pub relation: Option<&'static str>,
    pub fields: &'static [FilterField],
}

impl FieldRule {
    pub const fn equals(fields: &'static [FilterField]) -> Self {
        Self {
            kind: MatchKind::Equals,
            relation: None,
            fields,
        }
    }

    pub const fn contains(fields: &'static [FilterField]) -> Self {
        Self {
            kind: MatchKind::Contains,
            relation: None,
            fields,
        }
    }

    pub const fn equals_on(relation: &'static str, fields: &'static [FilterField]) -> Self {
        Self {
            kind: MatchKind::Equals,
            relation: Some(relation),
            fields,
        }
    }

    pub const fn contains_on(relation: &'static str, fields: &'static [FilterField]) -> Self {
        Self {
            kind: MatchKind::Contains,
            relation: Some(relation),
            fields,
        }
    }

    fn field(&self, name: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A field resolved against an entity's rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedField {
    pub kind: MatchKind,
    pub relation: Option<&'static str>,
    pub field: FilterField,
}

/// Ordered whitelist of filterable fields for one entity and its relations.
#[derive(Debug)]
pub struct EntityFilterSpec {
    pub entity: &'static str,
    pub rules: &'static [FieldRule],
}

impl EntityFilterSpec {
    /// Find the rule covering `field`, direct or under `relation`.
    ///
    /// When several rules list the same pair, the last declared one wins.
    pub fn resolve(&self, relation: Option<&str>, field: &str) -> Option<ResolvedField> {
        self.rules
            .iter()
            .rev()
            .filter(|rule| rule.relation == relation)
            .find_map(|rule| {
                rule.field(field).map(|f| ResolvedField {
                    kind: rule.kind,
                    relation: rule.relation,
                    field: *f,
                })
            })
    }

    /// Relation names this entity can be filtered through, in declaration order.
    pub fn relations(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for relation in self.rules.iter().filter_map(|rule| rule.relation) {
            if !names.contains(&relation) {
                names.push(relation);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: FilterField = FilterField::new("name", FieldType::Text);
    const ID: FilterField = FilterField::new("id", FieldType::Uuid);
    const DIRECT_EQ: &[FilterField] = &[ID, NAME];
    const DIRECT_LIKE: &[FilterField] = &[NAME];
    const OWNER_EQ: &[FilterField] = &[ID];

    static SPEC: EntityFilterSpec = EntityFilterSpec {
        entity: "Thing",
        rules: &[
            FieldRule::equals(DIRECT_EQ),
            FieldRule::contains(DIRECT_LIKE),
            FieldRule::equals_on("owner", OWNER_EQ),
        ],
    };

    #[test]
    fn test_last_declared_rule_wins() {
        let resolved = SPEC.resolve(None, "name").unwrap();
        assert_eq!(resolved.kind, MatchKind::Contains);

        let resolved = SPEC.resolve(None, "id").unwrap();
        assert_eq!(resolved.kind, MatchKind::Equals);
    }

    #[test]
    fn test_relation_scope_is_respected() {
        assert!(SPEC.resolve(Some("owner"), "id").is_some());
        assert!(SPEC.resolve(Some("owner"), "name").is_none());
        assert!(SPEC.resolve(Some("other"), "id").is_none());
        assert_eq!(
            SPEC.resolve(Some("owner"), "id").unwrap().relation,
            Some("owner")
        );
    }

    #[test]
    fn test_relations_are_deduplicated() {
        assert_eq!(SPEC.relations(), vec!["owner"]);
    }
}
