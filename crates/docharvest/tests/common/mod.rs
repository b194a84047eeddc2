//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use assert_fs::prelude::*;
use assert_fs::TempDir;

use docharvest::{Database, EmailParser, Pipeline, PipelineConfig};

pub const FORM: &str = r#"
<html><body>
  <form>
    <input type="text" name="full_name" value="Νίκος Παπαδόπουλος">
    <input type="email" name="email" value="nikos@example.gr">
    <input type="tel" name="phone" value="6912345678">
    <input type="text" name="company" value="Acme ΑΕ">
    <select name="service">
      <option value="web">Web</option>
      <option value="crm" selected>CRM</option>
    </select>
    <textarea name="message">  Θα ήθελα προσφορά.  </textarea>
    <select name="priority"><option selected>Υψηλή</option></select>
    <input type="date" name="submission_date" value="2024-01-15">
  </form>
</body></html>
"#;

pub const EMAIL: &str = "From: Maria K <maria@example.com>\n\
Subject: Request\n\
\n\
Name: Maria K\n\
Email: maria@example.com\n\
Phone: 6987654321\n";

pub const INVOICE: &str = r#"
<html>
  <body>
    <p>Αριθμός: INV-1001</p>
    <p>Ημερομηνία: 12/01/2024</p>
    <p>Πελάτης:</p>
    <p>John Doe</p>
    <p>Καθαρή Αξία: €150.00</p>
    <p>ΦΠΑ 24%: €24.00</p>
    <p>ΣΥΝΟΛΟ: €174.00</p>
  </body>
</html>
"#;

/// A corpus directory laid out as `forms/`, `emails/`, `invoices/`.
pub struct Corpus {
    pub dir: TempDir,
}

impl Corpus {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for sub in ["forms", "emails", "invoices"] {
            dir.child(sub).create_dir_all().unwrap();
        }
        Self { dir }
    }

    /// One file of each kind.
    pub fn sample() -> Self {
        let corpus = Self::new();
        corpus.write("forms/contact.html", FORM);
        corpus.write("emails/request.eml", EMAIL);
        corpus.write("invoices/inv-1001.html", INVOICE);
        corpus
    }

    pub fn write(&self, relative: &str, content: &str) {
        self.dir.child(relative).write_str(content).unwrap();
    }

    pub fn pipeline(&self, db: &Database) -> Pipeline {
        Pipeline::new(
            PipelineConfig::for_corpus(self.dir.path()),
            Arc::new(db.clone()),
            EmailParser::new(),
        )
    }
}

pub fn memory_db() -> Database {
    Database::open_in_memory().unwrap()
}
