//! The `package.xml` document.
//!
//! [`PackageManifest`] is the in-memory form of the manifest written to the
//! root of every package archive. Serialisation uses the xml-rs event writer
//! and always produces indented UTF-8 XML 1.0.

use crate::descriptor::{Author, PhpBounds};
use crate::error::Result;
use crate::tree::{ManifestNode, TargetRoot};
use chrono::{Local, NaiveDateTime};
use std::io::Write;
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

/// Name of the manifest file at the archive root.
pub const MANIFEST_FILE_NAME: &str = "package.xml";

/// Build date and time recorded in the manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildStamp {
    /// ISO-8601 calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Wall-clock time, `HH:MM:SS`.
    pub time: String,
}

impl BuildStamp {
    /// Stamp the current local date and time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    /// Stamp a fixed date and time.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use connect_packager::manifest::BuildStamp;
    ///
    /// let at = NaiveDate::from_ymd_opt(2026, 3, 9)
    ///     .and_then(|d| d.and_hms_opt(7, 5, 0))
    ///     .unwrap();
    /// let stamp = BuildStamp::from_datetime(at);
    /// assert_eq!(stamp.date, "2026-03-09");
    /// assert_eq!(stamp.time, "07:05:00");
    /// ```
    #[must_use]
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
        }
    }
}

/// Metadata, authors, contents and dependencies of a package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageManifest {
    /// Extension name.
    pub name: String,
    /// Version from the module's `config.xml`.
    pub version: String,
    /// Release stability.
    pub stability: String,
    /// License name.
    pub license: String,
    /// License URI, written as the `uri` attribute of `<license>`.
    pub license_uri: String,
    /// Distribution channel.
    pub channel: String,
    /// One-line summary.
    pub summary: String,
    /// Long description.
    pub description: String,
    /// Release notes.
    pub notes: String,
    /// Authors in descriptor order.
    pub authors: Vec<Author>,
    /// When the package was built.
    pub stamp: BuildStamp,
    /// One root per target, in first-appearance order.
    pub contents: Vec<TargetRoot>,
    /// PHP version bounds.
    pub php: PhpBounds,
}

impl PackageManifest {
    /// Serialise the manifest to pretty-printed XML bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PackagerError::XmlWrite`] if the writer fails.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = EmitterConfig::new()
            .perform_indent(true)
            .create_writer(Vec::new());
        self.write_xml(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Write the manifest as a complete XML document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PackagerError::XmlWrite`] if the writer fails.
    pub fn write_xml<W: Write>(&self, writer: &mut EventWriter<W>) -> Result<()> {
        writer.write(XmlEvent::StartDocument {
            version: XmlVersion::Version10,
            encoding: Some("utf-8"),
            standalone: None,
        })?;
        writer.write(XmlEvent::start_element("package"))?;

        text_element(writer, "name", &self.name)?;
        text_element(writer, "version", &self.version)?;
        text_element(writer, "stability", &self.stability)?;
        writer.write(XmlEvent::start_element("license").attr("uri", &self.license_uri))?;
        characters(writer, &self.license)?;
        writer.write(XmlEvent::end_element())?;
        text_element(writer, "channel", &self.channel)?;
        text_element(writer, "extends", "")?;
        text_element(writer, "summary", &self.summary)?;
        text_element(writer, "description", &self.description)?;
        text_element(writer, "notes", &self.notes)?;

        writer.write(XmlEvent::start_element("authors"))?;
        for author in &self.authors {
            writer.write(XmlEvent::start_element("author"))?;
            text_element(writer, "name", &author.name)?;
            text_element(writer, "user", &author.user)?;
            text_element(writer, "email", &author.email)?;
            writer.write(XmlEvent::end_element())?;
        }
        writer.write(XmlEvent::end_element())?;

        text_element(writer, "date", &self.stamp.date)?;
        text_element(writer, "time", &self.stamp.time)?;

        writer.write(XmlEvent::start_element("contents"))?;
        for root in &self.contents {
            writer.write(XmlEvent::start_element("target").attr("name", root.target.as_str()))?;
            write_nodes(writer, &root.children)?;
            writer.write(XmlEvent::end_element())?;
        }
        writer.write(XmlEvent::end_element())?;

        text_element(writer, "compatible", "")?;

        writer.write(XmlEvent::start_element("dependencies"))?;
        writer.write(XmlEvent::start_element("required"))?;
        writer.write(XmlEvent::start_element("php"))?;
        text_element(writer, "min", &self.php.min)?;
        text_element(writer, "max", &self.php.max)?;
        writer.write(XmlEvent::end_element())?;
        writer.write(XmlEvent::end_element())?;
        writer.write(XmlEvent::end_element())?;

        writer.write(XmlEvent::end_element().name("package"))?;
        Ok(())
    }

    /// Default archive file name, `<name>-<version>.tgz`.
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        format!("{}-{}.tgz", self.name, self.version)
    }

    /// Total number of file leaves across all targets.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.contents.iter().map(TargetRoot::file_count).sum()
    }
}

fn write_nodes<W: Write>(writer: &mut EventWriter<W>, nodes: &[ManifestNode]) -> Result<()> {
    for node in nodes {
        match node {
            ManifestNode::Dir { name, children } => {
                writer.write(XmlEvent::start_element("dir").attr("name", name))?;
                write_nodes(writer, children)?;
            }
            ManifestNode::File { name, fingerprint } => {
                writer.write(
                    XmlEvent::start_element("file")
                        .attr("name", name)
                        .attr("hash", fingerprint.as_str()),
                )?;
            }
        }
        writer.write(XmlEvent::end_element())?;
    }
    Ok(())
}

fn text_element<W: Write>(writer: &mut EventWriter<W>, name: &str, text: &str) -> Result<()> {
    writer.write(XmlEvent::start_element(name))?;
    characters(writer, text)?;
    writer.write(XmlEvent::end_element())?;
    Ok(())
}

fn characters<W: Write>(writer: &mut EventWriter<W>, text: &str) -> Result<()> {
    if !text.is_empty() {
        writer.write(XmlEvent::characters(text))?;
    }
    Ok(())
}
