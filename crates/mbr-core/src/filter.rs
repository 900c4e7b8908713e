//! Search filter construction.
//!
//! Filters are built as values and rendered to RFC 4515 text only at the
//! wire boundary, so in-process backends can evaluate them directly.

use std::fmt;

use crate::entry::DirectoryEntry;
use crate::sid::Sid;

/// Object class carried by group entries.
pub const GROUP_OBJECT_CLASS: &str = "group";

/// A search predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `(attribute=value)`.
    Equality {
        /// Attribute name.
        attribute: String,
        /// Assertion value (unescaped).
        value: String,
    },
    /// `(attribute=*)`.
    Present(String),
    /// `(&...)`.
    And(Vec<Filter>),
    /// `(|...)`.
    Or(Vec<Filter>),
}

impl Filter {
    /// Equality assertion.
    #[must_use]
    pub fn eq(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equality {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Presence assertion.
    #[must_use]
    pub fn present(attribute: impl Into<String>) -> Self {
        Self::Present(attribute.into())
    }

    /// Conjunction of this filter and another.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut parts) => {
                parts.push(other);
                Self::And(parts)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Evaluates the filter against an entry.
    ///
    /// Attribute names and values compare case-insensitively. An equality
    /// assertion whose value is a SID string also matches a binary SID
    /// attribute encoding the same identifier.
    #[must_use]
    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        match self {
            Self::Equality { attribute, value } => {
                let sid = value.parse::<Sid>().ok();
                let same_sid = |bytes: &[u8]| {
                    sid.as_ref()
                        .is_some_and(|s| Sid::from_bytes(bytes).is_ok_and(|b| &b == s))
                };
                entry
                    .values(attribute)
                    .iter()
                    .any(|v| v.eq_ignore_ascii_case(value) || same_sid(v.as_bytes()))
                    || entry
                        .get_binary_attrs(attribute)
                        .unwrap_or(&[])
                        .iter()
                        .any(|b| b.as_slice() == value.as_bytes() || same_sid(b))
            }
            Self::Present(attribute) => entry.has_attr(attribute),
            Self::And(parts) => parts.iter().all(|f| f.matches(entry)),
            Self::Or(parts) => parts.iter().any(|f| f.matches(entry)),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equality { attribute, value } => {
                write!(f, "({attribute}={})", ldap_escape(value))
            }
            Self::Present(attribute) => write!(f, "({attribute}=*)"),
            Self::And(parts) => {
                f.write_str("(&")?;
                for part in parts {
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
            Self::Or(parts) => {
                f.write_str("(|")?;
                for part in parts {
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Escapes special characters in filter assertion values.
#[must_use]
pub fn ldap_escape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\5c"),
            '*' => result.push_str("\\2a"),
            '(' => result.push_str("\\28"),
            ')' => result.push_str("\\29"),
            '\0' => result.push_str("\\00"),
            _ => result.push(c),
        }
    }
    result
}

/// Account-name filter: `(attr=uid)`.
#[must_use]
pub fn name_filter(login_attribute: &str, uid: &str) -> Filter {
    Filter::eq(login_attribute, uid)
}

/// `(objectclass=group)`.
#[must_use]
pub fn group_class_filter() -> Filter {
    Filter::eq("objectclass", GROUP_OBJECT_CLASS)
}

/// Group-name filter qualified by object class.
#[must_use]
pub fn group_filter(name_attribute: &str, gid: &str) -> Filter {
    Filter::eq(name_attribute, gid).and(group_class_filter())
}

/// Matches entries carrying any of `classes` as object class.
#[must_use]
pub fn object_class_filter<S: AsRef<str>>(classes: &[S]) -> Filter {
    let mut parts: Vec<Filter> = classes
        .iter()
        .map(|class| Filter::eq("objectclass", class.as_ref()))
        .collect();
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        Filter::Or(parts)
    }
}

/// Name filter qualified by any of the given object classes.
#[must_use]
pub fn class_name_filter<S: AsRef<str>>(name_attribute: &str, name: &str, classes: &[S]) -> Filter {
    Filter::eq(name_attribute, name).and(object_class_filter(classes))
}

/// Filter matching the leading RDN of a distinguished name.
#[must_use]
pub fn dn_filter(rdn_attribute: &str, rdn_value: &str) -> Filter {
    Filter::eq(rdn_attribute, rdn_value)
}

/// Filter matching an entry by security identifier.
#[must_use]
pub fn sid_filter(sid_attribute: &str, sid: &Sid) -> Filter {
    Filter::eq(sid_attribute, sid.to_string())
}

/// Filter matching users whose primary group has the given token.
#[must_use]
pub fn primary_group_id_filter(primary_group_id_attribute: &str, token: &str) -> Filter {
    Filter::eq(primary_group_id_attribute, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_rfc4515_text() {
        assert_eq!(name_filter("samaccountname", "john").to_string(), "(samaccountname=john)");
        assert_eq!(
            group_filter("cn", "bros").to_string(),
            "(&(cn=bros)(objectclass=group))"
        );
        assert_eq!(Filter::present("objectClass").to_string(), "(objectClass=*)");
        assert_eq!(
            Filter::Or(vec![Filter::eq("a", "1"), Filter::eq("b", "2")]).to_string(),
            "(|(a=1)(b=2))"
        );
    }

    #[test]
    fn and_flattens() {
        let f = Filter::eq("a", "1").and(Filter::eq("b", "2")).and(Filter::eq("c", "3"));
        assert_eq!(f.to_string(), "(&(a=1)(b=2)(c=3))");
    }

    #[test]
    fn class_name_filter_lists_each_class() {
        assert_eq!(
            class_name_filter("cn", "bros", &["group"]).to_string(),
            "(&(cn=bros)(objectclass=group))"
        );

        let f = class_name_filter("cn", "staff", &["group", "organizationalUnit"]);
        assert_eq!(
            f.to_string(),
            "(&(cn=staff)(|(objectclass=group)(objectclass=organizationalUnit)))"
        );
        let ou = DirectoryEntry::new("ou=staff,dc=example,dc=com")
            .with_attr("cn", ["staff"])
            .with_attr("objectClass", ["top", "organizationalUnit"]);
        assert!(f.matches(&ou));
        assert!(!group_filter("cn", "staff").matches(&ou));
    }

    #[test]
    fn ldap_escape_special_chars() {
        assert_eq!(ldap_escape("john*"), "john\\2a");
        assert_eq!(ldap_escape("(admin)"), "\\28admin\\29");
        assert_eq!(ldap_escape("user\\name"), "user\\5cname");
        assert_eq!(ldap_escape("Bar, Foo"), "Bar, Foo");
    }

    #[test]
    fn equality_is_case_insensitive() {
        let entry = DirectoryEntry::new("cn=Bros,dc=example,dc=com")
            .with_attr("cn", ["Bros"])
            .with_attr("objectClass", ["top", "Group"]);
        assert!(group_filter("CN", "bros").matches(&entry));
        assert!(!group_filter("cn", "buds").matches(&entry));
        assert!(Filter::present("OBJECTCLASS").matches(&entry));
        assert!(!Filter::present("member").matches(&entry));
    }

    #[test]
    fn sid_string_matches_binary_attribute() {
        let sid: Sid = "S-1-5-21-34567-23456-12345".parse().unwrap();
        let entry = DirectoryEntry::new("cn=p_group,dc=example,dc=com")
            .with_binary_attr("objectSid", sid.to_bytes());
        assert!(sid_filter("objectsid", &sid).matches(&entry));

        let other = sid.with_rid(513).unwrap();
        assert!(!sid_filter("objectsid", &other).matches(&entry));
    }
}
