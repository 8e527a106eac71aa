//! Shared fixtures: a small class-file writer and zip helpers

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

/// Writes just enough of a class file for dependency extraction
pub struct ClassFileBuilder {
    name: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<(String, String, Option<String>)>,
    methods: Vec<MethodBuilder>,
    annotations: Vec<String>,
}

impl ClassFileBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn super_class(mut self, name: &str) -> Self {
        self.super_class = Some(name.to_string());
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    /// Field with a plain descriptor such as `Lpkg/B;`
    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push((name.to_string(), descriptor.to_string(), None));
        self
    }

    /// Field with a generic signature such as `Ljava/util/List<Lpkg/C;>;`
    pub fn generic_field(mut self, name: &str, descriptor: &str, signature: &str) -> Self {
        self.fields
            .push((name.to_string(), descriptor.to_string(), Some(signature.to_string())));
        self
    }

    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Class-level annotation given by internal name
    pub fn annotation(mut self, name: &str) -> Self {
        self.annotations.push(format!("L{};", name));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();

        let this_class = pool.class(&self.name);
        let super_class = self.super_class.as_deref().map_or(0, |name| pool.class(name));
        let interfaces: Vec<u16> = self.interfaces.iter().map(|name| pool.class(name)).collect();

        let mut fields = Vec::new();
        for (name, descriptor, signature) in &self.fields {
            fields.extend([0x00, 0x02]);
            fields.extend(pool.utf8(name).to_be_bytes());
            fields.extend(pool.utf8(descriptor).to_be_bytes());
            match signature {
                Some(signature) => {
                    fields.extend(1u16.to_be_bytes());
                    let attribute_name = pool.utf8("Signature");
                    let signature_index = pool.utf8(signature);
                    fields.extend(attribute(attribute_name, &signature_index.to_be_bytes()));
                }
                None => fields.extend(0u16.to_be_bytes()),
            }
        }

        let mut methods = Vec::new();
        for method in &self.methods {
            methods.extend(method.encode(&mut pool));
        }

        let mut attributes = Vec::new();
        let mut attribute_count = 0u16;
        if !self.annotations.is_empty() {
            let mut body = (self.annotations.len() as u16).to_be_bytes().to_vec();
            for descriptor in &self.annotations {
                body.extend(pool.utf8(descriptor).to_be_bytes());
                body.extend(0u16.to_be_bytes());
            }
            let attribute_name = pool.utf8("RuntimeVisibleAnnotations");
            attributes.extend(attribute(attribute_name, &body));
            attribute_count += 1;
        }

        let mut out = MAGIC.to_vec();
        out.extend([0, 0, 0, 52]);
        out.extend((pool.count + 1).to_be_bytes());
        out.extend(&pool.bytes);
        out.extend([0x00, 0x21]);
        out.extend(this_class.to_be_bytes());
        out.extend(super_class.to_be_bytes());
        out.extend((interfaces.len() as u16).to_be_bytes());
        for interface in interfaces {
            out.extend(interface.to_be_bytes());
        }
        out.extend((self.fields.len() as u16).to_be_bytes());
        out.extend(fields);
        out.extend((self.methods.len() as u16).to_be_bytes());
        out.extend(methods);
        out.extend(attribute_count.to_be_bytes());
        out.extend(attributes);
        out
    }
}

/// Reference-bearing instruction emitted by [`MethodBuilder`]
#[derive(Debug, Clone)]
enum Insn {
    /// `new`, `anewarray`, `checkcast` or `instanceof` with a class operand
    Type(u8, String),
    Ldc(String),
    LdcW(String),
    /// Field or method instruction with its constant pool tag
    Member { opcode: u8, tag: u8, owner: String, name: String, descriptor: String },
    InvokeDynamic { name: String, descriptor: String },
    MultiANewArray(String, u8),
}

/// One method: descriptor, attributes and an optional Code body
///
/// Any instruction, catch clause or local variable gives the method a Code
/// attribute; the body always ends with `return`.
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: String,
    descriptor: String,
    signature: Option<String>,
    exceptions: Vec<String>,
    annotations: Vec<String>,
    parameter_annotations: Vec<(usize, String, bool)>,
    annotation_default: Option<String>,
    has_code: bool,
    instructions: Vec<Insn>,
    catches: Vec<String>,
    locals: Vec<(String, String)>,
    local_types: Vec<(String, String)>,
}

impl MethodBuilder {
    pub fn new(name: &str, descriptor: &str) -> Self {
        Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            exceptions: Vec::new(),
            annotations: Vec::new(),
            parameter_annotations: Vec::new(),
            annotation_default: None,
            has_code: false,
            instructions: Vec::new(),
            catches: Vec::new(),
            locals: Vec::new(),
            local_types: Vec::new(),
        }
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    /// Declared exception (`throws` clause) given by internal name
    pub fn throws(mut self, name: &str) -> Self {
        self.exceptions.push(name.to_string());
        self
    }

    pub fn annotation(mut self, name: &str) -> Self {
        self.annotations.push(format!("L{};", name));
        self
    }

    /// Annotation on parameter `index`, runtime-visible or invisible
    pub fn parameter_annotation(mut self, index: usize, name: &str, visible: bool) -> Self {
        self.parameter_annotations.push((index, format!("L{};", name), visible));
        self
    }

    /// Annotation element default holding a class literal such as `Lpkg/X;`
    pub fn default_class(mut self, descriptor: &str) -> Self {
        self.annotation_default = Some(descriptor.to_string());
        self
    }

    fn push(mut self, insn: Insn) -> Self {
        self.has_code = true;
        self.instructions.push(insn);
        self
    }

    pub fn new_instance(self, class: &str) -> Self {
        self.push(Insn::Type(0xBB, class.to_string()))
    }

    pub fn anewarray(self, class: &str) -> Self {
        self.push(Insn::Type(0xBD, class.to_string()))
    }

    pub fn checkcast(self, class: &str) -> Self {
        self.push(Insn::Type(0xC0, class.to_string()))
    }

    /// `ldc` of a class constant (name or array descriptor)
    pub fn ldc_class(self, class: &str) -> Self {
        self.push(Insn::Ldc(class.to_string()))
    }

    pub fn ldc_w_class(self, class: &str) -> Self {
        self.push(Insn::LdcW(class.to_string()))
    }

    pub fn get_static(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.push(Insn::Member {
            opcode: 0xB2,
            tag: 9,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        })
    }

    pub fn invoke_static(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.push(Insn::Member {
            opcode: 0xB8,
            tag: 10,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        })
    }

    pub fn invoke_dynamic(self, name: &str, descriptor: &str) -> Self {
        self.push(Insn::InvokeDynamic {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        })
    }

    pub fn multianewarray(self, descriptor: &str, dimensions: u8) -> Self {
        self.push(Insn::MultiANewArray(descriptor.to_string(), dimensions))
    }

    /// Exception handler over the whole body catching `class`
    pub fn catches(mut self, class: &str) -> Self {
        self.has_code = true;
        self.catches.push(class.to_string());
        self
    }

    /// LocalVariableTable entry
    pub fn local(mut self, name: &str, descriptor: &str) -> Self {
        self.has_code = true;
        self.locals.push((name.to_string(), descriptor.to_string()));
        self
    }

    /// LocalVariableTypeTable entry
    pub fn local_type(mut self, name: &str, signature: &str) -> Self {
        self.has_code = true;
        self.local_types.push((name.to_string(), signature.to_string()));
        self
    }

    fn encode(&self, pool: &mut Pool) -> Vec<u8> {
        let mut attributes = Vec::new();
        let mut count = 0u16;

        if self.has_code {
            let name = pool.utf8("Code");
            attributes.extend(attribute(name, &self.encode_code(pool)));
            count += 1;
        }
        if let Some(signature) = &self.signature {
            let name = pool.utf8("Signature");
            let index = pool.utf8(signature);
            attributes.extend(attribute(name, &index.to_be_bytes()));
            count += 1;
        }
        if !self.exceptions.is_empty() {
            let mut body = (self.exceptions.len() as u16).to_be_bytes().to_vec();
            for exception in &self.exceptions {
                body.extend(pool.class(exception).to_be_bytes());
            }
            let name = pool.utf8("Exceptions");
            attributes.extend(attribute(name, &body));
            count += 1;
        }
        if !self.annotations.is_empty() {
            let body = annotation_list(pool, self.annotations.iter());
            let name = pool.utf8("RuntimeVisibleAnnotations");
            attributes.extend(attribute(name, &body));
            count += 1;
        }
        for (visible, attribute_name) in [
            (true, "RuntimeVisibleParameterAnnotations"),
            (false, "RuntimeInvisibleParameterAnnotations"),
        ] {
            let entries: Vec<&(usize, String, bool)> =
                self.parameter_annotations.iter().filter(|(_, _, v)| *v == visible).collect();
            let Some(parameters) = entries.iter().map(|(index, _, _)| index + 1).max() else {
                continue;
            };
            let mut body = vec![parameters as u8];
            for parameter in 0..parameters {
                let names = entries
                    .iter()
                    .filter(|(index, _, _)| *index == parameter)
                    .map(|(_, name, _)| name);
                body.extend(annotation_list(pool, names));
            }
            let name = pool.utf8(attribute_name);
            attributes.extend(attribute(name, &body));
            count += 1;
        }
        if let Some(descriptor) = &self.annotation_default {
            let mut body = vec![b'c'];
            body.extend(pool.utf8(descriptor).to_be_bytes());
            let name = pool.utf8("AnnotationDefault");
            attributes.extend(attribute(name, &body));
            count += 1;
        }

        let mut out = vec![0x00, 0x01];
        out.extend(pool.utf8(&self.name).to_be_bytes());
        out.extend(pool.utf8(&self.descriptor).to_be_bytes());
        out.extend(count.to_be_bytes());
        out.extend(attributes);
        out
    }

    fn encode_code(&self, pool: &mut Pool) -> Vec<u8> {
        let mut code = Vec::new();
        for insn in &self.instructions {
            match insn {
                Insn::Type(opcode, class) => {
                    code.push(*opcode);
                    code.extend(pool.class(class).to_be_bytes());
                }
                Insn::Ldc(class) => {
                    let index = u8::try_from(pool.class(class)).expect("ldc operand fits one byte");
                    code.extend([0x12, index]);
                }
                Insn::LdcW(class) => {
                    code.push(0x13);
                    code.extend(pool.class(class).to_be_bytes());
                }
                Insn::Member {
                    opcode,
                    tag,
                    owner,
                    name,
                    descriptor,
                } => {
                    code.push(*opcode);
                    code.extend(pool.member(*tag, owner, name, descriptor).to_be_bytes());
                }
                Insn::InvokeDynamic { name, descriptor } => {
                    code.push(0xBA);
                    code.extend(pool.invoke_dynamic(name, descriptor).to_be_bytes());
                    code.extend([0, 0]);
                }
                Insn::MultiANewArray(descriptor, dimensions) => {
                    code.push(0xC5);
                    code.extend(pool.class(descriptor).to_be_bytes());
                    code.push(*dimensions);
                }
            }
        }
        code.push(0xB1);

        let mut out = vec![0, 4, 0, 4];
        out.extend((code.len() as u32).to_be_bytes());
        out.extend(&code);

        out.extend((self.catches.len() as u16).to_be_bytes());
        for catch in &self.catches {
            out.extend(0u16.to_be_bytes());
            out.extend((code.len() as u16).to_be_bytes());
            out.extend(((code.len() - 1) as u16).to_be_bytes());
            out.extend(pool.class(catch).to_be_bytes());
        }

        let mut attributes = Vec::new();
        let mut count = 0u16;
        for (attribute_name, table) in [("LocalVariableTable", &self.locals), ("LocalVariableTypeTable", &self.local_types)] {
            if table.is_empty() {
                continue;
            }
            let mut body = (table.len() as u16).to_be_bytes().to_vec();
            for (slot, (name, descriptor)) in table.iter().enumerate() {
                body.extend(0u16.to_be_bytes());
                body.extend((code.len() as u16).to_be_bytes());
                body.extend(pool.utf8(name).to_be_bytes());
                body.extend(pool.utf8(descriptor).to_be_bytes());
                body.extend((slot as u16).to_be_bytes());
            }
            let name = pool.utf8(attribute_name);
            attributes.extend(attribute(name, &body));
            count += 1;
        }
        out.extend(count.to_be_bytes());
        out.extend(attributes);
        out
    }
}

/// `num_annotations` followed by element-less annotations
fn annotation_list<'a>(pool: &mut Pool, descriptors: impl Iterator<Item = &'a String>) -> Vec<u8> {
    let descriptors: Vec<&String> = descriptors.collect();
    let mut body = (descriptors.len() as u16).to_be_bytes().to_vec();
    for descriptor in descriptors {
        body.extend(pool.utf8(descriptor).to_be_bytes());
        body.extend(0u16.to_be_bytes());
    }
    body
}

#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    count: u16,
}

impl Pool {
    fn utf8(&mut self, text: &str) -> u16 {
        self.bytes.push(1);
        self.bytes.extend((text.len() as u16).to_be_bytes());
        self.bytes.extend(text.as_bytes());
        self.count += 1;
        self.count
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.bytes.push(7);
        self.bytes.extend(name_index.to_be_bytes());
        self.count += 1;
        self.count
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.bytes.push(12);
        self.bytes.extend(name_index.to_be_bytes());
        self.bytes.extend(descriptor_index.to_be_bytes());
        self.count += 1;
        self.count
    }

    fn member(&mut self, tag: u8, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(owner);
        let nat_index = self.name_and_type(name, descriptor);
        self.bytes.push(tag);
        self.bytes.extend(class_index.to_be_bytes());
        self.bytes.extend(nat_index.to_be_bytes());
        self.count += 1;
        self.count
    }

    /// Bootstrap method index 0; the decoder does not follow it
    fn invoke_dynamic(&mut self, name: &str, descriptor: &str) -> u16 {
        let nat_index = self.name_and_type(name, descriptor);
        self.bytes.push(18);
        self.bytes.extend(0u16.to_be_bytes());
        self.bytes.extend(nat_index.to_be_bytes());
        self.count += 1;
        self.count
    }
}

fn attribute(name_index: u16, body: &[u8]) -> Vec<u8> {
    let mut out = name_index.to_be_bytes().to_vec();
    out.extend((body.len() as u32).to_be_bytes());
    out.extend(body);
    out
}

/// A class that only extends `java/lang/Object`
pub fn plain_class(name: &str) -> Vec<u8> {
    ClassFileBuilder::new(name).build()
}

/// Write `<root>/<name>.class`, creating package directories
pub fn write_class(root: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = root.join(format!("{}.class", name));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

/// In-memory zip archive with entries in the given order
pub fn zip_bytes(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn write_zip(path: &Path, entries: &[(&str, Vec<u8>)]) -> PathBuf {
    fs::write(path, zip_bytes(entries)).unwrap();
    path.to_path_buf()
}

/// The `pkg` example: A extends B, holds a `List<C>` and is annotated with an external type
pub fn write_pkg_example(root: &Path) {
    let a = ClassFileBuilder::new("pkg/A")
        .super_class("pkg/B")
        .generic_field("items", "Ljava/util/List;", "Ljava/util/List<Lpkg/C;>;")
        .annotation("ext/lib/Ann")
        .build();
    write_class(root, "pkg/A", &a);
    write_class(root, "pkg/B", &plain_class("pkg/B"));
    write_class(root, "pkg/C", &plain_class("pkg/C"));
}
