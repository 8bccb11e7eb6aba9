// Phone inventory: the silence / non-silence partition of all phones

use hashbrown::HashMap;

/// Which half of the partition a phone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneClass {
    /// Silence, noise and similar non-speech phones. These also get an
    /// undecorated symbol.
    Silence,
    /// Speech phones. These only ever appear with a position tag.
    Nonsilence,
}

/// Error raised when the declared phone lists do not form a partition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhoneSetError {
    #[error("phone {0:?} is declared more than once")]
    Duplicate(String),
    #[error("phone {0:?} is declared as both silence and non-silence")]
    Overlap(String),
    #[error("phone names must be non-empty and free of whitespace, got {0:?}")]
    InvalidName(String),
}

/// Ordered silence and non-silence phone lists.
///
/// The order given by the caller is kept: symbol ids are allocated by walking
/// the silence phones first, then the non-silence phones.
#[derive(Debug, Clone)]
pub struct PhoneSet {
    silence: Vec<String>,
    nonsilence: Vec<String>,
    classes: HashMap<String, PhoneClass>,
}

impl PhoneSet {
    /// Build the inventory, rejecting duplicates and phones that appear in
    /// both lists.
    pub fn new<S, N>(silence: S, nonsilence: N) -> Result<Self, PhoneSetError>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let mut classes = HashMap::new();
        let silence = Self::collect(silence, PhoneClass::Silence, &mut classes)?;
        let nonsilence = Self::collect(nonsilence, PhoneClass::Nonsilence, &mut classes)?;
        Ok(Self {
            silence,
            nonsilence,
            classes,
        })
    }

    fn collect<I>(
        phones: I,
        class: PhoneClass,
        classes: &mut HashMap<String, PhoneClass>,
    ) -> Result<Vec<String>, PhoneSetError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut out = Vec::new();
        for phone in phones {
            let phone: String = phone.into();
            if phone.is_empty() || phone.chars().any(char::is_whitespace) {
                return Err(PhoneSetError::InvalidName(phone));
            }
            match classes.get(&phone) {
                Some(&existing) if existing == class => {
                    return Err(PhoneSetError::Duplicate(phone));
                }
                Some(_) => return Err(PhoneSetError::Overlap(phone)),
                None => {}
            }
            classes.insert(phone.clone(), class);
            out.push(phone);
        }
        Ok(out)
    }

    pub fn silence(&self) -> &[String] {
        &self.silence
    }

    pub fn nonsilence(&self) -> &[String] {
        &self.nonsilence
    }

    /// Class of `phone`, or `None` if it was never declared.
    pub fn class_of(&self, phone: &str) -> Option<PhoneClass> {
        self.classes.get(phone).copied()
    }

    pub fn contains(&self, phone: &str) -> bool {
        self.classes.contains_key(phone)
    }

    pub fn is_silence(&self, phone: &str) -> bool {
        self.class_of(phone) == Some(PhoneClass::Silence)
    }

    /// Total number of declared phones.
    pub fn len(&self) -> usize {
        self.silence.len() + self.nonsilence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
