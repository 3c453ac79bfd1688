//! Minimal element tree for reading descriptor XML.
//!
//! Connect files and Magento module files are small, so they are read fully
//! into memory with xml-rs and queried with slash-separated element paths
//! (`authors/name/name`), the same shape the descriptors are documented in.

use crate::error::{PackagerError, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use xml::reader::{ParserConfig, XmlEvent};

/// An XML element with its attributes, text and child elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Local element name.
    pub name: String,
    /// Attributes as `(local name, value)` pairs in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated character data directly inside this element.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Parse a document and return its root element.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed XML.
    pub fn parse<R: Read>(source: R) -> std::result::Result<Self, xml::reader::Error> {
        let reader = ParserConfig::new()
            .trim_whitespace(true)
            .cdata_to_characters(true)
            .create_reader(source);

        let mut stack: Vec<Self> = vec![Self::default()];
        for event in reader {
            match event? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => stack.push(Self {
                    name: name.local_name,
                    attributes: attributes
                        .into_iter()
                        .map(|attr| (attr.name.local_name, attr.value))
                        .collect(),
                    ..Self::default()
                }),
                XmlEvent::EndElement { .. } => {
                    if let Some(done) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(done);
                        }
                    }
                }
                XmlEvent::Characters(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                _ => {}
            }
        }

        // The parser rejects documents without a root element, so the
        // synthetic document node holds exactly one child here.
        Ok(stack
            .pop()
            .and_then(|document| document.children.into_iter().next())
            .unwrap_or_default())
    }

    /// Read and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ReadFile`] if the file cannot be read, or
    /// [`PackagerError::XmlParse`] if it is not well-formed XML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| PackagerError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(bytes.as_slice()).map_err(|source| PackagerError::XmlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Iterate over direct children called `name`.
    pub fn children_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Self> + use<'a, 'n> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Return every element reached by following `path` from this element.
    ///
    /// Each segment selects all matching children of the previous step, so
    /// `contents/target/target` yields every inner `<target>` element.
    #[must_use]
    pub fn find_all(&self, path: &str) -> Vec<&Self> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(vec![self], |current, segment| {
                current
                    .into_iter()
                    .flat_map(|element| element.children_named(segment))
                    .collect()
            })
    }

    /// Return the first element reached by following `path`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Self> {
        self.find_all(path).into_iter().next()
    }

    /// Return the trimmed text of the first element at `path`.
    ///
    /// Absent elements yield `None`; empty elements yield `Some("")`.
    #[must_use]
    pub fn find_text(&self, path: &str) -> Option<&str> {
        self.find(path).map(|element| element.text.trim())
    }

    /// Return the trimmed text of every element at `path`.
    #[must_use]
    pub fn find_texts(&self, path: &str) -> Vec<&str> {
        self.find_all(path)
            .into_iter()
            .map(|element| element.text.trim())
            .collect()
    }

    /// Return the value of attribute `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A parsed document together with the path it was read from.
///
/// Keeps the path around so lookups of required elements can report where
/// the element was expected.
#[derive(Clone, Debug)]
pub struct Document {
    path: PathBuf,
    root: Element,
}

impl Document {
    /// Read and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// See [`Element::from_file`].
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            root: Element::from_file(path)?,
        })
    }

    /// The path the document was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document's root element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// Return the text at `path`, failing if the element is absent or empty.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingElement`] naming `path`.
    pub fn required_text(&self, path: &str) -> Result<String> {
        self.root
            .find_text(path)
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| PackagerError::MissingElement {
                path: self.path.clone(),
                element: path.to_owned(),
            })
    }

    /// Return the text at `path`, or an empty string when absent.
    #[must_use]
    pub fn optional_text(&self, path: &str) -> String {
        self.root.find_text(path).unwrap_or_default().to_owned()
    }
}
