//! Built-in type catalog.
//!
//! Order matters: it is the registry insertion order, which breaks ties in
//! inference ranking and orders compatibility results.

use super::{
    sample::SampleFormat,
    types::{DataTypeCategory as Cat, DataTypeDescriptor}
};

const MY: &str = "mysql";
const PG: &str = "postgresql";
const LITE: &str = "sqlite";
const MS: &str = "sqlserver";
const ORA: &str = "oracle";

/// Static description of one catalog entry.
pub(super) struct TypeSpec {
    name:        &'static str,
    category:    Cat,
    dialects:    &'static [&'static str],
    aliases:     &'static [&'static str],
    conversions: &'static [(&'static str, &'static str)],
    sample:      Option<SampleFormat>,
    specificity: f32,
    size:        bool,
    precision:   bool
}

impl TypeSpec {
    pub(super) fn to_descriptor(&self) -> DataTypeDescriptor {
        DataTypeDescriptor {
            canonical_name:     self.name.into(),
            category:           self.category,
            supported_dialects: self.dialects.iter().map(|d| (*d).into()).collect(),
            aliases:            self.aliases.iter().map(|a| (*a).into()).collect(),
            conversion_rules:   self
                .conversions
                .iter()
                .map(|(d, t)| ((*d).into(), (*t).into()))
                .collect(),
            sample_format:      self.sample,
            specificity:        self.specificity,
            accepts_size:       self.size,
            accepts_precision:  self.precision
        }
    }
}

const fn int_range(min: i128, max: i128) -> Option<SampleFormat> {
    Some(SampleFormat::Integer {
        min,
        max
    })
}

pub(super) const BUILTIN: &[TypeSpec] = &[
    // numeric
    TypeSpec {
        name:        "TINYINT",
        category:    Cat::Numeric,
        dialects:    &[MY, MS],
        aliases:     &["INT1"],
        conversions: &[(PG, "SMALLINT"), (LITE, "INTEGER"), (ORA, "NUMBER")],
        sample:      int_range(-128, 255),
        specificity: 0.97,
        size:        true,
        precision:   false
    },
    TypeSpec {
        name:        "SMALLINT",
        category:    Cat::Numeric,
        dialects:    &[MY, PG, MS, ORA],
        aliases:     &["INT2"],
        conversions: &[(LITE, "INTEGER")],
        sample:      int_range(-32_768, 32_767),
        specificity: 0.95,
        size:        true,
        precision:   false
    },
    TypeSpec {
        name:        "INTEGER",
        category:    Cat::Numeric,
        dialects:    &[MY, PG, LITE, MS, ORA],
        aliases:     &["INT", "INT4", "MEDIUMINT", "SIGNED"],
        conversions: &[],
        sample:      int_range(i32::MIN as i128, i32::MAX as i128),
        specificity: 0.9,
        size:        true,
        precision:   false
    },
    TypeSpec {
        name:        "BIGINT",
        category:    Cat::Numeric,
        dialects:    &[MY, PG, MS],
        aliases:     &["INT8"],
        conversions: &[(LITE, "INTEGER"), (ORA, "NUMBER")],
        sample:      int_range(i64::MIN as i128, i64::MAX as i128),
        specificity: 0.85,
        size:        true,
        precision:   false
    },
    TypeSpec {
        name:        "SERIAL",
        category:    Cat::Numeric,
        dialects:    &[PG],
        aliases:     &["SERIAL4", "SERIAL2", "SMALLSERIAL"],
        conversions: &[(MY, "INTEGER"), (MS, "INTEGER"), (LITE, "INTEGER"), (ORA, "NUMBER")],
        sample:      None,
        specificity: 0.0,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "BIGSERIAL",
        category:    Cat::Numeric,
        dialects:    &[PG],
        aliases:     &["SERIAL8"],
        conversions: &[(MY, "BIGINT"), (MS, "BIGINT"), (LITE, "INTEGER"), (ORA, "NUMBER")],
        sample:      None,
        specificity: 0.0,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "DECIMAL",
        category:    Cat::Numeric,
        dialects:    &[MY, PG, MS],
        aliases:     &["DEC", "FIXED"],
        conversions: &[(LITE, "NUMERIC"), (ORA, "NUMBER")],
        sample:      Some(SampleFormat::Decimal),
        specificity: 0.8,
        size:        false,
        precision:   true
    },
    TypeSpec {
        name:        "NUMERIC",
        category:    Cat::Numeric,
        dialects:    &[MY, PG, LITE, MS],
        aliases:     &[],
        conversions: &[(ORA, "NUMBER")],
        sample:      Some(SampleFormat::Decimal),
        specificity: 0.78,
        size:        false,
        precision:   true
    },
    TypeSpec {
        name:        "NUMBER",
        category:    Cat::Numeric,
        dialects:    &[ORA],
        aliases:     &[],
        conversions: &[(MY, "DECIMAL"), (PG, "NUMERIC"), (MS, "DECIMAL"), (LITE, "NUMERIC")],
        sample:      Some(SampleFormat::Decimal),
        specificity: 0.75,
        size:        false,
        precision:   true
    },
    TypeSpec {
        name:        "REAL",
        category:    Cat::Numeric,
        dialects:    &[MY, PG, LITE, MS],
        aliases:     &["FLOAT4"],
        conversions: &[(ORA, "BINARY_DOUBLE")],
        sample:      Some(SampleFormat::Float),
        specificity: 0.62,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "DOUBLE PRECISION",
        category:    Cat::Numeric,
        dialects:    &[MY, PG],
        aliases:     &["DOUBLE", "FLOAT8"],
        conversions: &[(LITE, "REAL"), (MS, "FLOAT"), (ORA, "BINARY_DOUBLE")],
        sample:      Some(SampleFormat::Float),
        specificity: 0.6,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "FLOAT",
        category:    Cat::Numeric,
        dialects:    &[MY, PG, MS, ORA],
        aliases:     &[],
        conversions: &[(LITE, "REAL")],
        sample:      Some(SampleFormat::Float),
        specificity: 0.6,
        size:        true,
        precision:   false
    },
    TypeSpec {
        name:        "BINARY_DOUBLE",
        category:    Cat::Numeric,
        dialects:    &[ORA],
        aliases:     &["BINARY_FLOAT"],
        conversions: &[(MY, "DOUBLE PRECISION"), (PG, "DOUBLE PRECISION"), (MS, "FLOAT"), (LITE, "REAL")],
        sample:      Some(SampleFormat::Float),
        specificity: 0.55,
        size:        false,
        precision:   false
    },
    // monetary
    TypeSpec {
        name:        "MONEY",
        category:    Cat::Monetary,
        dialects:    &[PG, MS],
        aliases:     &["SMALLMONEY"],
        conversions: &[(MY, "DECIMAL"), (LITE, "NUMERIC"), (ORA, "NUMBER")],
        sample:      Some(SampleFormat::Money),
        specificity: 0.9,
        size:        false,
        precision:   false
    },
    // boolean
    TypeSpec {
        name:        "BOOLEAN",
        category:    Cat::Boolean,
        dialects:    &[MY, PG],
        aliases:     &["BOOL"],
        conversions: &[(MS, "BIT"), (LITE, "INTEGER"), (ORA, "NUMBER")],
        sample:      Some(SampleFormat::Boolean),
        specificity: 0.96,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "BIT",
        category:    Cat::Boolean,
        dialects:    &[MY, PG, MS],
        aliases:     &["BIT VARYING", "VARBIT"],
        conversions: &[(LITE, "INTEGER"), (ORA, "NUMBER")],
        sample:      Some(SampleFormat::Boolean),
        specificity: 0.7,
        size:        true,
        precision:   false
    },
    // string
    TypeSpec {
        name:        "CHAR",
        category:    Cat::String,
        dialects:    &[MY, PG, MS, ORA],
        aliases:     &["CHARACTER", "NCHAR", "BPCHAR"],
        conversions: &[(LITE, "TEXT")],
        sample:      Some(SampleFormat::Text {
            max_len: Some(10)
        }),
        specificity: 0.55,
        size:        true,
        precision:   false
    },
    TypeSpec {
        name:        "VARCHAR",
        category:    Cat::String,
        dialects:    &[MY, PG, MS],
        aliases:     &["CHARACTER VARYING", "NVARCHAR", "NATIONAL CHARACTER VARYING"],
        conversions: &[(ORA, "VARCHAR2"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::Text {
            max_len: Some(255)
        }),
        specificity: 0.5,
        size:        true,
        precision:   false
    },
    TypeSpec {
        name:        "VARCHAR2",
        category:    Cat::String,
        dialects:    &[ORA],
        aliases:     &["NVARCHAR2"],
        conversions: &[(MY, "VARCHAR"), (PG, "VARCHAR"), (MS, "VARCHAR"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::Text {
            max_len: Some(4000)
        }),
        specificity: 0.45,
        size:        true,
        precision:   false
    },
    TypeSpec {
        name:        "TEXT",
        category:    Cat::String,
        dialects:    &[MY, PG, LITE, MS],
        aliases:     &["TINYTEXT", "MEDIUMTEXT", "LONGTEXT", "NTEXT", "CITEXT", "STRING"],
        conversions: &[(ORA, "CLOB")],
        sample:      Some(SampleFormat::Text {
            max_len: None
        }),
        specificity: 0.3,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "CLOB",
        category:    Cat::String,
        dialects:    &[ORA],
        aliases:     &["NCLOB"],
        conversions: &[(MY, "TEXT"), (PG, "TEXT"), (LITE, "TEXT"), (MS, "VARCHAR")],
        sample:      Some(SampleFormat::Text {
            max_len: None
        }),
        specificity: 0.25,
        size:        false,
        precision:   false
    },
    // date-time
    TypeSpec {
        name:        "DATE",
        category:    Cat::DateTime,
        dialects:    &[MY, PG, MS, ORA],
        aliases:     &[],
        conversions: &[(LITE, "TEXT")],
        sample:      Some(SampleFormat::Date),
        specificity: 0.95,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "TIME",
        category:    Cat::DateTime,
        dialects:    &[MY, PG, MS],
        aliases:     &["TIME WITHOUT TIME ZONE", "TIME WITH TIME ZONE", "TIMETZ"],
        conversions: &[(LITE, "TEXT"), (ORA, "TIMESTAMP")],
        sample:      Some(SampleFormat::Time),
        specificity: 0.95,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "TIMESTAMP",
        category:    Cat::DateTime,
        dialects:    &[MY, PG, ORA],
        aliases:     &["TIMESTAMP WITHOUT TIME ZONE"],
        conversions: &[(MS, "DATETIME2"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::DateTime),
        specificity: 0.86,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "TIMESTAMPTZ",
        category:    Cat::DateTime,
        dialects:    &[PG, ORA],
        aliases:     &["TIMESTAMP WITH TIME ZONE"],
        conversions: &[(MY, "TIMESTAMP"), (MS, "DATETIMEOFFSET"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::DateTimeTz),
        specificity: 0.9,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "DATETIME",
        category:    Cat::DateTime,
        dialects:    &[MY, MS],
        aliases:     &["SMALLDATETIME"],
        conversions: &[(PG, "TIMESTAMP"), (ORA, "TIMESTAMP"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::DateTime),
        specificity: 0.85,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "DATETIME2",
        category:    Cat::DateTime,
        dialects:    &[MS],
        aliases:     &[],
        conversions: &[(MY, "DATETIME"), (PG, "TIMESTAMP"), (ORA, "TIMESTAMP"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::DateTime),
        specificity: 0.8,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "DATETIMEOFFSET",
        category:    Cat::DateTime,
        dialects:    &[MS],
        aliases:     &[],
        conversions: &[(PG, "TIMESTAMPTZ"), (ORA, "TIMESTAMPTZ"), (MY, "TIMESTAMP"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::DateTimeTz),
        specificity: 0.85,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "YEAR",
        category:    Cat::DateTime,
        dialects:    &[MY],
        aliases:     &[],
        conversions: &[(PG, "SMALLINT"), (MS, "SMALLINT"), (LITE, "INTEGER"), (ORA, "NUMBER")],
        sample:      int_range(1901, 2155),
        specificity: 0.5,
        size:        false,
        precision:   false
    },
    // interval
    TypeSpec {
        name:        "INTERVAL",
        category:    Cat::Interval,
        dialects:    &[PG, ORA],
        aliases:     &[],
        conversions: &[(MY, "VARCHAR"), (MS, "VARCHAR"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::Interval),
        specificity: 0.9,
        size:        false,
        precision:   false
    },
    // binary
    TypeSpec {
        name:        "BLOB",
        category:    Cat::Binary,
        dialects:    &[MY, LITE, ORA],
        aliases:     &["TINYBLOB", "MEDIUMBLOB", "LONGBLOB"],
        conversions: &[(PG, "BYTEA"), (MS, "VARBINARY")],
        sample:      Some(SampleFormat::Hex),
        specificity: 0.4,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "BYTEA",
        category:    Cat::Binary,
        dialects:    &[PG],
        aliases:     &[],
        conversions: &[(MY, "BLOB"), (LITE, "BLOB"), (ORA, "BLOB"), (MS, "VARBINARY")],
        sample:      Some(SampleFormat::Hex),
        specificity: 0.5,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "VARBINARY",
        category:    Cat::Binary,
        dialects:    &[MY, MS],
        aliases:     &["BINARY", "BINARY VARYING", "IMAGE"],
        conversions: &[(PG, "BYTEA"), (LITE, "BLOB"), (ORA, "RAW")],
        sample:      Some(SampleFormat::Hex),
        specificity: 0.45,
        size:        true,
        precision:   false
    },
    TypeSpec {
        name:        "RAW",
        category:    Cat::Binary,
        dialects:    &[ORA],
        aliases:     &["LONG RAW"],
        conversions: &[(MY, "VARBINARY"), (MS, "VARBINARY"), (PG, "BYTEA"), (LITE, "BLOB")],
        sample:      Some(SampleFormat::Hex),
        specificity: 0.42,
        size:        true,
        precision:   false
    },
    // json/xml
    TypeSpec {
        name:        "JSON",
        category:    Cat::JsonXml,
        dialects:    &[MY, PG, ORA],
        aliases:     &[],
        conversions: &[(MS, "VARCHAR"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::Json),
        specificity: 0.9,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "JSONB",
        category:    Cat::JsonXml,
        dialects:    &[PG],
        aliases:     &[],
        conversions: &[(MY, "JSON"), (ORA, "JSON"), (MS, "VARCHAR"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::Json),
        specificity: 0.88,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "XML",
        category:    Cat::JsonXml,
        dialects:    &[PG, MS, ORA],
        aliases:     &["XMLTYPE"],
        conversions: &[(MY, "TEXT"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::Xml),
        specificity: 0.9,
        size:        false,
        precision:   false
    },
    // uuid
    TypeSpec {
        name:        "UUID",
        category:    Cat::Uuid,
        dialects:    &[PG],
        aliases:     &[],
        conversions: &[(MS, "UNIQUEIDENTIFIER"), (MY, "CHAR"), (LITE, "TEXT"), (ORA, "RAW")],
        sample:      Some(SampleFormat::Uuid),
        specificity: 1.0,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "UNIQUEIDENTIFIER",
        category:    Cat::Uuid,
        dialects:    &[MS],
        aliases:     &[],
        conversions: &[(PG, "UUID"), (MY, "CHAR"), (LITE, "TEXT"), (ORA, "RAW")],
        sample:      Some(SampleFormat::Uuid),
        specificity: 0.98,
        size:        false,
        precision:   false
    },
    // network
    TypeSpec {
        name:        "INET",
        category:    Cat::Network,
        dialects:    &[PG],
        aliases:     &[],
        conversions: &[(MY, "VARCHAR"), (MS, "VARCHAR"), (ORA, "VARCHAR2"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::IpAddress),
        specificity: 0.98,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "CIDR",
        category:    Cat::Network,
        dialects:    &[PG],
        aliases:     &[],
        conversions: &[(MY, "VARCHAR"), (MS, "VARCHAR"), (ORA, "VARCHAR2"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::Cidr),
        specificity: 0.99,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "MACADDR",
        category:    Cat::Network,
        dialects:    &[PG],
        aliases:     &["MACADDR8"],
        conversions: &[(MY, "VARCHAR"), (MS, "VARCHAR"), (ORA, "VARCHAR2"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::MacAddress),
        specificity: 0.99,
        size:        false,
        precision:   false
    },
    // spatial
    TypeSpec {
        name:        "POINT",
        category:    Cat::Spatial,
        dialects:    &[MY, PG],
        aliases:     &[],
        conversions: &[(MS, "GEOMETRY"), (ORA, "GEOMETRY"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::Point),
        specificity: 0.95,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "GEOMETRY",
        category:    Cat::Spatial,
        dialects:    &[MY, PG, MS, ORA],
        aliases:     &[
            "GEOGRAPHY",
            "LINESTRING",
            "POLYGON",
            "MULTIPOINT",
            "MULTILINESTRING",
            "MULTIPOLYGON",
            "SDO_GEOMETRY"
        ],
        conversions: &[(LITE, "BLOB")],
        sample:      Some(SampleFormat::Wkt),
        specificity: 0.85,
        size:        false,
        precision:   false
    },
    // enum
    TypeSpec {
        name:        "ENUM",
        category:    Cat::Enum,
        dialects:    &[MY],
        aliases:     &["SET"],
        conversions: &[(PG, "TEXT"), (MS, "VARCHAR"), (ORA, "VARCHAR2"), (LITE, "TEXT")],
        sample:      None,
        specificity: 0.0,
        size:        false,
        precision:   false
    },
    // composite
    TypeSpec {
        name:        "ARRAY",
        category:    Cat::Composite,
        dialects:    &[PG],
        aliases:     &[],
        conversions: &[(MY, "JSON"), (ORA, "JSON"), (MS, "VARCHAR"), (LITE, "TEXT")],
        sample:      Some(SampleFormat::PgArray),
        specificity: 0.8,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "HSTORE",
        category:    Cat::Composite,
        dialects:    &[PG],
        aliases:     &[],
        conversions: &[(MY, "JSON"), (ORA, "JSON"), (MS, "VARCHAR"), (LITE, "TEXT")],
        sample:      None,
        specificity: 0.0,
        size:        false,
        precision:   false
    },
    // other
    TypeSpec {
        name:        "TSVECTOR",
        category:    Cat::Other,
        dialects:    &[PG],
        aliases:     &["TSQUERY"],
        conversions: &[(MY, "TEXT"), (MS, "VARCHAR"), (ORA, "CLOB"), (LITE, "TEXT")],
        sample:      None,
        specificity: 0.0,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "ROWID",
        category:    Cat::Other,
        dialects:    &[ORA],
        aliases:     &["UROWID"],
        conversions: &[],
        sample:      None,
        specificity: 0.0,
        size:        false,
        precision:   false
    },
    TypeSpec {
        name:        "SQL_VARIANT",
        category:    Cat::Other,
        dialects:    &[MS],
        aliases:     &[],
        conversions: &[],
        sample:      None,
        specificity: 0.0,
        size:        false,
        precision:   false
    }
];
