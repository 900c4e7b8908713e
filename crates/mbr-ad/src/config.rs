//! Resolver configuration.
//!
//! Search bases and the attribute names the resolvers read. Defaults match
//! a stock Active Directory schema; only the two search bases are
//! required.

use serde::{Deserialize, Serialize};

use crate::error::{MembershipError, MembershipResult};

/// Active Directory resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdConfig {
    // === Search bases ===
    /// Naming context searched for primary-group members.
    pub base_dn: String,

    /// Base DN for group lookups.
    pub group_base: String,

    /// Base DN for user lookups. `None` uses the server default.
    pub user_base: Option<String>,

    // === Attributes ===
    /// Account-name attribute (login).
    pub login_attribute: String,

    /// Group-name attribute used by group lookups.
    pub group_name_attribute: String,

    /// Upward membership attribute (groups an entry belongs to).
    pub member_of_attribute: String,

    /// Downward membership attribute (members a group contains).
    pub member_attribute: String,

    /// Binary security identifier attribute.
    pub object_sid_attribute: String,

    /// Primary group RID stored on users.
    pub primary_group_id_attribute: String,

    /// Constructed RID attribute of groups.
    pub primary_group_token_attribute: String,

    // === Classification ===
    /// Object classes treated as nestable groups. A member with any of
    /// these classes is looked up again by name under `group_base`, with
    /// the class restricted to this list.
    pub group_classes: Vec<String>,

    /// Object classes treated as users.
    pub person_classes: Vec<String>,
}

impl Default for AdConfig {
    fn default() -> Self {
        Self {
            base_dn: String::new(),
            group_base: String::new(),
            user_base: None,
            login_attribute: "sAMAccountName".to_string(),
            group_name_attribute: "cn".to_string(),
            member_of_attribute: "memberOf".to_string(),
            member_attribute: "member".to_string(),
            object_sid_attribute: "objectSid".to_string(),
            primary_group_id_attribute: "primaryGroupID".to_string(),
            primary_group_token_attribute: "primaryGroupToken".to_string(),
            group_classes: vec!["group".to_string(), "organizationalUnit".to_string()],
            person_classes: vec![
                "person".to_string(),
                "organizationalPerson".to_string(),
                "userProxy".to_string(),
            ],
        }
    }
}

impl AdConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> AdConfigBuilder {
        AdConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns [`MembershipError::Configuration`] if a search base or a
    /// required attribute name is empty.
    pub fn validate(&self) -> MembershipResult<()> {
        if self.base_dn.trim().is_empty() {
            return Err(MembershipError::config("base_dn cannot be empty"));
        }
        if self.group_base.trim().is_empty() {
            return Err(MembershipError::config("group_base cannot be empty"));
        }
        if self.user_base.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(MembershipError::config("user_base cannot be empty when set"));
        }

        let attributes = [
            ("login_attribute", &self.login_attribute),
            ("group_name_attribute", &self.group_name_attribute),
            ("member_of_attribute", &self.member_of_attribute),
            ("member_attribute", &self.member_attribute),
        ];
        for (name, value) in attributes {
            if value.trim().is_empty() {
                return Err(MembershipError::config(format!("{name} cannot be empty")));
            }
        }

        Ok(())
    }
}

/// Builder for [`AdConfig`].
#[derive(Debug, Default)]
pub struct AdConfigBuilder {
    config: AdConfig,
}

impl AdConfigBuilder {
    /// Sets the naming context.
    #[must_use]
    pub fn base_dn(mut self, dn: impl Into<String>) -> Self {
        self.config.base_dn = dn.into();
        self
    }

    /// Sets the group search base.
    #[must_use]
    pub fn group_base(mut self, dn: impl Into<String>) -> Self {
        self.config.group_base = dn.into();
        self
    }

    /// Sets the user search base.
    #[must_use]
    pub fn user_base(mut self, dn: impl Into<String>) -> Self {
        self.config.user_base = Some(dn.into());
        self
    }

    /// Sets the account-name attribute.
    #[must_use]
    pub fn login_attribute(mut self, attr: impl Into<String>) -> Self {
        self.config.login_attribute = attr.into();
        self
    }

    /// Sets the group-name attribute.
    #[must_use]
    pub fn group_name_attribute(mut self, attr: impl Into<String>) -> Self {
        self.config.group_name_attribute = attr.into();
        self
    }

    /// Sets the object classes treated as groups.
    #[must_use]
    pub fn group_classes(mut self, classes: Vec<String>) -> Self {
        self.config.group_classes = classes;
        self
    }

    /// Sets the object classes treated as users.
    #[must_use]
    pub fn person_classes(mut self, classes: Vec<String>) -> Self {
        self.config.person_classes = classes;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// ## Errors
    ///
    /// See [`AdConfig::validate`].
    pub fn build(self) -> MembershipResult<AdConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
