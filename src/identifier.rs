// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Conservative validation for account identifiers.
//!
//! A [`Login`] is the only user-supplied value embedded into REST routes and
//! GraphQL documents. Values must start with an ASCII alphanumeric character
//! and may continue with ASCII alphanumerics, hyphens and underscores, up to
//! 39 characters in total.

use std::fmt;

use regex::Regex;

use crate::error::Error;

const LOGIN_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_-]{0,38}$";

/// Account identifier that passed the allow-list check.
#[derive(Debug, Clone, PartialEq, Eq, Hash,)]
pub struct Login(String,);

impl Login
{
    /// Validates `raw` after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] when the trimmed value is empty
    /// or contains characters outside the allow-list.
    ///
    /// # Examples
    ///
    /// ```
    /// use profile_readme::Login;
    ///
    /// let login = Login::parse(" octo-cat ",)?;
    /// assert_eq!(login.as_str(), "octo-cat");
    /// assert!(Login::parse("octo\"cat",).is_err());
    /// # Ok::<(), profile_readme::Error>(())
    /// ```
    pub fn parse(raw: &str,) -> Result<Self, Error,>
    {
        let trimmed = raw.trim();
        let pattern = Regex::new(LOGIN_PATTERN,)
            .map_err(|e| Error::validation(format!("invalid login pattern: {e}"),),)?;

        if pattern.is_match(trimmed,) {
            Ok(Self(trimmed.to_owned(),),)
        } else {
            Err(Error::invalid_identifier(raw,),)
        }
    }

    /// Borrows the validated identifier.
    pub fn as_str(&self,) -> &str
    {
        &self.0
    }
}

impl fmt::Display for Login
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(&self.0,)
    }
}

impl AsRef<str,> for Login
{
    fn as_ref(&self,) -> &str
    {
        &self.0
    }
}
