use crate::core::address_family::AddressFamily;
use crate::core::errors::{Error, Result};
use crate::core::range_document::{RangeDocument, RangeEntry};
use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

/*-------------------------------------------------------------------------------------------------
  Encodings and Fields
-------------------------------------------------------------------------------------------------*/

/// Output encoding for query results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Encoding {
    /// Selected fields joined by the separator, one entry per line
    #[default]
    Text,
    /// The document as pretty-printed JSON
    Json,
    /// The document as YAML
    Yaml,
    /// Selected fields in a table
    Table,
    /// Selected fields as CSV with a header row
    Csv,
}

/// Entry field selected for text, table, and CSV output.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Field {
    /// CIDR block
    #[value(alias = "prefix")]
    Cidr,
    /// AWS region
    Region,
    /// AWS service
    Service,
    /// Service, region, and CIDR block
    All,
}

/// Which entry fields are rendered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct FieldSet {
    cidr: bool,
    region: bool,
    service: bool,
}

impl FieldSet {
    fn new(fields: &[Field]) -> Self {
        let all = fields.contains(&Field::All);
        Self {
            cidr: all || fields.contains(&Field::Cidr),
            region: all || fields.contains(&Field::Region),
            service: all || fields.contains(&Field::Service),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Render Options
-------------------------------------------------------------------------------------------------*/

/// Options controlling how a [RangeDocument] is rendered.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub encoding: Encoding,
    pub fields: Vec<Field>,
    pub ipv4_only: bool,
    pub ipv6_only: bool,
    pub separator: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Text,
            fields: vec![Field::All],
            ipv4_only: false,
            ipv6_only: false,
            separator: " | ".to_string(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Render
-------------------------------------------------------------------------------------------------*/

/// Render a document in the requested encoding.
///
/// `ipv4_only` and `ipv6_only` drop the entries of the other family before
/// encoding; setting both (or neither) keeps both families. The field selection
/// applies to the text, table, and CSV encodings; JSON and YAML always carry the
/// full document.
pub fn render(document: &RangeDocument, options: &RenderOptions) -> Result<String> {
    let document = match (options.ipv4_only, options.ipv6_only) {
        (true, false) => document.only(AddressFamily::IPv4),
        (false, true) => document.only(AddressFamily::IPv6),
        _ => document.clone(),
    };
    let fields = FieldSet::new(&options.fields);

    match options.encoding {
        Encoding::Text => Ok(render_text(&document, fields, &options.separator)),
        Encoding::Json => serde_json::to_string_pretty(&document)
            .map(|json| json + "\n")
            .map_err(Error::render),
        Encoding::Yaml => serde_yaml::to_string(&document).map_err(Error::render),
        Encoding::Table => Ok(render_table(&document, fields)),
        Encoding::Csv => render_csv(&document, fields),
    }
}

/// Entries of both families, IPv4 first.
fn entries(document: &RangeDocument) -> impl Iterator<Item = &dyn RangeEntry> {
    document
        .prefixes()
        .iter()
        .map(|entry| entry as &dyn RangeEntry)
        .chain(
            document
                .ipv6_prefixes()
                .iter()
                .map(|entry| entry as &dyn RangeEntry),
        )
}

/*--------------------------------------------------------------------------------------
  Text
--------------------------------------------------------------------------------------*/

fn render_text(document: &RangeDocument, fields: FieldSet, separator: &str) -> String {
    let mut output = String::new();
    for entry in entries(document) {
        if fields.service {
            output.push_str(entry.service());
            output.push_str(separator);
        }
        if fields.region {
            output.push_str(entry.region());
            output.push_str(separator);
        }
        if fields.cidr {
            output.push_str(&entry.cidr().to_string());
        }
        output.push('\n');
    }
    output
}

/*--------------------------------------------------------------------------------------
  Table
--------------------------------------------------------------------------------------*/

fn render_table(document: &RangeDocument, fields: FieldSet) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header = [
        (fields.cidr, "IP Prefix"),
        (fields.region, "Region"),
        (fields.service, "Service"),
    ];
    table.set_header(header.iter().filter(|(selected, _)| *selected).map(
        |(_, name)| {
            Cell::new(name)
                .add_attribute(Attribute::Bold)
                .fg(Color::Green)
        },
    ));

    for entry in entries(document) {
        let mut row: Vec<Cell> = Vec::new();
        if fields.cidr {
            row.push(Cell::new(entry.cidr()).add_attribute(Attribute::Bold));
        }
        if fields.region {
            row.push(Cell::new(entry.region()));
        }
        if fields.service {
            row.push(Cell::new(entry.service()));
        }
        table.add_row(row);
    }

    format!("{table}\n")
}

/*--------------------------------------------------------------------------------------
  CSV
--------------------------------------------------------------------------------------*/

fn render_csv(document: &RangeDocument, fields: FieldSet) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = [
        (fields.cidr, "cidr"),
        (fields.region, "region"),
        (fields.service, "service"),
    ];
    writer
        .write_record(
            header
                .iter()
                .filter(|(selected, _)| *selected)
                .map(|(_, name)| *name),
        )
        .map_err(Error::render)?;

    for entry in entries(document) {
        let cidr = entry.cidr().to_string();
        let record = [
            (fields.cidr, cidr.as_str()),
            (fields.region, entry.region()),
            (fields.service, entry.service()),
        ];
        writer
            .write_record(
                record
                    .iter()
                    .filter(|(selected, _)| *selected)
                    .map(|(_, value)| *value),
            )
            .map_err(Error::render)?;
    }

    let bytes = writer.into_inner().map_err(|error| Error::render(error.to_string()))?;
    String::from_utf8(bytes).map_err(Error::render)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
