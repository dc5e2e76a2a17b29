#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::time::Duration;

    use chrono::{DateTime, Utc};

    use crate::convert::Decode;
    use crate::record::{Fields, Record};
    use crate::source::MapSource;

    #[derive(Debug, Default, PartialEq)]
    pub struct Embedded1 {
        pub embedded_val1: String,
    }

    impl Record for Embedded1 {
        fn describe(fields: &mut Fields<Self>) {
            fields.leaf("embedded_val1", |c| &mut c.embedded_val1);
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Embedded2 {
        pub embedded_val2: String,
    }

    impl Record for Embedded2 {
        fn describe(fields: &mut Fields<Self>) {
            fields.leaf("embedded_val2", |c| &mut c.embedded_val2);
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct PrivateEmbedded {
        pub private_val: String,
    }

    impl Record for PrivateEmbedded {
        fn describe(fields: &mut Fields<Self>) {
            fields.leaf("private_val", |c| &mut c.private_val);
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Inner {
        pub inner_most: String,
    }

    impl Record for Inner {
        fn describe(fields: &mut Fields<Self>) {
            fields.leaf("inner_most", |c| &mut c.inner_most);
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Outer {
        pub nested: Inner,
    }

    impl Record for Outer {
        fn describe(fields: &mut Fields<Self>) {
            fields.nested("nested", |c| &mut c.nested);
        }
    }

    // -- Structural fixture: embedding, nesting, renames, skipped fields --------

    #[derive(Debug, Default)]
    pub struct Structure {
        pub embedded1: Embedded1,
        pub embedded2: Option<Embedded2>,
        pub private_embedded1: PrivateEmbedded,
        pub private_embedded2: Option<PrivateEmbedded>,
        pub private: String,
        pub ignored: String,
        pub nested: Outer,
        pub nested_ptr: Option<Inner>,
        pub nested2: Inner,
        pub not_yet_renamed: String,
    }

    impl Record for Structure {
        fn describe(fields: &mut Fields<Self>) {
            fields.embedded("embedded1", |c| &mut c.embedded1);
            fields.embedded_opt("embedded2", |c| &mut c.embedded2);
            fields
                .embedded("private_embedded1", |c| &mut c.private_embedded1)
                .read_only();
            fields
                .embedded_opt("private_embedded2", |c| &mut c.private_embedded2)
                .read_only();
            fields.leaf("private", |c| &mut c.private).read_only();
            fields.leaf("ignored", |c| &mut c.ignored).skip();
            fields.nested("nested", |c| &mut c.nested);
            fields.nested_opt("nested_ptr", |c| &mut c.nested_ptr);
            fields.nested("nested2", |c| &mut c.nested2).rename("nested_renamed");
            fields.leaf("not_yet_renamed", |c| &mut c.not_yet_renamed).rename("renamed");
        }
    }

    /// Kebab-case keys for every settable [`Structure`] field, plus values
    /// for fields that must stay untouched.
    pub fn structure_source() -> MapSource {
        MapSource::from([
            ("embedded-val1", "e1"),
            ("embedded-val2", "e2"),
            ("private-val", "should not be here"),
            ("private", "should not be here"),
            ("ignored", "should not be here"),
            ("nested-nested-inner-most", "n2"),
            ("nested-ptr-inner-most", "np"),
            ("nested-renamed-inner-most", "nr"),
            ("renamed", "now"),
        ])
    }

    // -- Primitive fixture: one leaf per built-in conversion --------------------

    #[derive(Debug, Default)]
    pub struct Primitives {
        pub flag: bool,
        pub int: i64,
        pub int8: i8,
        pub int16: i16,
        pub int32: i32,
        pub uint: u64,
        pub uint8: u8,
        pub uint16: u16,
        pub uint32: u32,
        pub float32: f32,
        pub float64: f64,
        pub map: HashMap<String, i32>,
        pub ptr_string: Option<String>,
        pub byte_slice: Vec<u8>,
        pub int_slice: Vec<i64>,
        pub int_slice_delimiter: Vec<i64>,
        pub string: String,
    }

    impl Record for Primitives {
        fn describe(fields: &mut Fields<Self>) {
            fields.leaf("flag", |c| &mut c.flag);
            fields.leaf("int", |c| &mut c.int);
            fields.leaf("int8", |c| &mut c.int8);
            fields.leaf("int16", |c| &mut c.int16);
            fields.leaf("int32", |c| &mut c.int32);
            fields.leaf("uint", |c| &mut c.uint);
            fields.leaf("uint8", |c| &mut c.uint8);
            fields.leaf("uint16", |c| &mut c.uint16);
            fields.leaf("uint32", |c| &mut c.uint32);
            fields.leaf("float32", |c| &mut c.float32);
            fields.leaf("float64", |c| &mut c.float64);
            fields.leaf("map", |c| &mut c.map);
            fields.leaf("ptr_string", |c| &mut c.ptr_string);
            fields.leaf("byte_slice", |c| &mut c.byte_slice);
            fields.leaf("int_slice", |c| &mut c.int_slice);
            fields.leaf("int_slice_delimiter", |c| &mut c.int_slice_delimiter).delimiter(";");
            fields.leaf("string", |c| &mut c.string);
        }
    }

    pub fn primitives_source() -> MapSource {
        MapSource::from([
            ("flag", "true"),
            ("int", "-1"),
            ("int8", "-2"),
            ("int16", "-3"),
            ("int32", "-4"),
            ("uint", "1"),
            ("uint8", "2"),
            ("uint16", "3"),
            ("uint32", "4"),
            ("float32", "1.23"),
            ("float64", "2.34"),
            ("map", "k1=1&k2=2"),
            ("ptr-string", "pointed"),
            ("byte-slice", "as string"),
            ("int-slice", "1,2,3,4"),
            ("int-slice-delimiter", "5;6;7;8"),
            ("string", "test"),
        ])
    }

    // -- Error ordering fixture -------------------------------------------------

    #[derive(Debug, Default)]
    pub struct Flags {
        pub field_a: bool,
        pub field_b: i32,
    }

    impl Record for Flags {
        fn describe(fields: &mut Fields<Self>) {
            fields.leaf("field_a", |c| &mut c.field_a);
            fields.leaf("field_b", |c| &mut c.field_b);
        }
    }

    #[derive(Debug, Default)]
    pub struct Broken {
        pub nested: Flags,
        pub field_c: bool,
        pub missing: String,
    }

    impl Record for Broken {
        fn describe(fields: &mut Fields<Self>) {
            fields.nested("nested", |c| &mut c.nested);
            fields.leaf("field_c", |c| &mut c.field_c);
            fields.leaf("missing", |c| &mut c.missing);
        }
    }

    #[derive(Debug, Default)]
    pub struct Single {
        pub missing: String,
    }

    impl Record for Single {
        fn describe(fields: &mut Fields<Self>) {
            fields.leaf("missing", |c| &mut c.missing);
        }
    }

    // -- Custom parser fixtures ---------------------------------------------------

    #[derive(Debug, Default)]
    pub struct Timings {
        pub timeout: Duration,
        pub t1: DateTime<Utc>,
        pub t2: DateTime<Utc>,
        pub t3: DateTime<Utc>,
    }

    impl Record for Timings {
        fn describe(fields: &mut Fields<Self>) {
            fields.leaf("timeout", |c| &mut c.timeout);
            fields.leaf("t1", |c| &mut c.t1);
            fields.leaf("t2", |c| &mut c.t2).layout("Stamp");
            fields.leaf("t3", |c| &mut c.t3).layout("2006");
        }
    }

    /// A record type that a custom parser can turn into a single leaf.
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Endpoint {
        pub host: String,
        pub port: u16,
    }

    impl Record for Endpoint {
        fn describe(fields: &mut Fields<Self>) {
            fields.leaf("host", |c| &mut c.host);
            fields.leaf("port", |c| &mut c.port);
        }
    }

    impl Decode for Endpoint {}

    #[derive(Debug, Default)]
    pub struct Service {
        pub primary: Endpoint,
        pub fallback: Option<Endpoint>,
    }

    impl Record for Service {
        fn describe(fields: &mut Fields<Self>) {
            fields.nested("primary", |c| &mut c.primary);
            fields.nested_opt("fallback", |c| &mut c.fallback);
        }
    }

    // -- Anonymous field fixture --------------------------------------------------

    #[derive(Debug, Default)]
    pub struct WithAnonymous {
        pub raw: Vec<String>,
        pub hidden: u8,
        pub name: String,
    }

    impl Record for WithAnonymous {
        fn describe(fields: &mut Fields<Self>) {
            fields.anonymous("raw", |c| &mut c.raw);
            fields.anonymous("hidden", |c| &mut c.hidden).skip();
            fields.leaf("name", |c| &mut c.name);
        }
    }

    #[test]
    fn fixtures_describe_every_field() {
        use crate::record::Schema;
        assert_eq!(Schema::<Structure>::describe().fields().len(), 10);
        assert_eq!(Schema::<Primitives>::describe().fields().len(), 17);
        assert_eq!(Schema::<WithAnonymous>::describe().fields().len(), 3);
    }
}
