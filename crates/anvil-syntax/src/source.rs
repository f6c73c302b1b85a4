use std::fmt;

/// Kind of the top-level type in a compilation unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "@interface",
            TypeKind::Record => "record",
        }
    }
}

/// A member of a top-level type.
///
/// Members carry a raw `name` (what a caller types to look one up) and a
/// rendered `signature` (the display form shown in listings). Raw names are
/// not unique (two method overloads share one), which is what the
/// ambiguous-lookup contract in the resource tree resolves.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JavaMember {
    Field {
        name: String,
        type_name: String,
    },
    Method {
        name: String,
        parameters: Vec<String>,
        /// `None` for constructors.
        return_type: Option<String>,
    },
    EnumConstant {
        name: String,
    },
}

impl JavaMember {
    pub fn name(&self) -> &str {
        match self {
            JavaMember::Field { name, .. } => name,
            JavaMember::Method { name, .. } => name,
            JavaMember::EnumConstant { name } => name,
        }
    }

    /// Display form: `name::Type` for fields, `name(Param,Param)` for
    /// methods, the bare name for enum constants.
    pub fn signature(&self) -> String {
        match self {
            JavaMember::Field { name, type_name } => format!("{name}::{type_name}"),
            JavaMember::Method {
                name, parameters, ..
            } => format!("{name}({})", parameters.join(",")),
            JavaMember::EnumConstant { name } => name.clone(),
        }
    }
}

impl fmt::Display for JavaMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

/// A parsed compilation unit: one top-level type and its members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JavaSource {
    pub package: Option<String>,
    pub name: String,
    pub kind: TypeKind,
    pub members: Vec<JavaMember>,
}

impl JavaSource {
    pub fn new(package: Option<&str>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            package: package.map(str::to_owned),
            name: name.into(),
            kind,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: JavaMember) -> Self {
        self.members.push(member);
        self
    }

    /// `package.Name`, or just `Name` for the default package.
    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{package}.{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &JavaMember> {
        self.members
            .iter()
            .filter(|m| matches!(m, JavaMember::Field { .. }))
    }

    pub fn methods(&self) -> impl Iterator<Item = &JavaMember> {
        self.members
            .iter()
            .filter(|m| matches!(m, JavaMember::Method { .. }))
    }

    pub fn enum_constants(&self) -> impl Iterator<Item = &JavaMember> {
        self.members
            .iter()
            .filter(|m| matches!(m, JavaMember::EnumConstant { .. }))
    }

    /// Renders canonical source for this unit, good enough for scaffolding
    /// writes: package declaration, type header, enum constants, fields and
    /// method stubs. The output re-parses to the same package, name, kind
    /// and member names.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(package) = &self.package {
            out.push_str(&format!("package {package};\n\n"));
        }

        match self.kind {
            TypeKind::Record => {
                let components: Vec<String> = self
                    .fields()
                    .map(|m| match m {
                        JavaMember::Field { name, type_name } => format!("{type_name} {name}"),
                        _ => unreachable!(),
                    })
                    .collect();
                out.push_str(&format!(
                    "public record {}({}) {{\n",
                    self.name,
                    components.join(", ")
                ));
            }
            kind => {
                out.push_str(&format!("public {} {} {{\n", kind.keyword(), self.name));
            }
        }

        if self.kind == TypeKind::Enum {
            let constants: Vec<&str> = self.enum_constants().map(|m| m.name()).collect();
            if !constants.is_empty() {
                out.push_str(&format!("    {};\n", constants.join(", ")));
            }
        }

        if self.kind != TypeKind::Record {
            for member in self.fields() {
                if let JavaMember::Field { name, type_name } = member {
                    out.push_str(&format!("    private {type_name} {name};\n"));
                }
            }
        }

        for member in self.methods() {
            if let JavaMember::Method {
                name,
                parameters,
                return_type,
            } = member
            {
                let params: Vec<String> = parameters
                    .iter()
                    .enumerate()
                    .map(|(i, p)| format!("{p} arg{i}"))
                    .collect();
                let params = params.join(", ");
                match (self.kind, return_type) {
                    (TypeKind::Interface | TypeKind::Annotation, Some(ret)) => {
                        out.push_str(&format!("    {ret} {name}({params});\n"));
                    }
                    (TypeKind::Interface | TypeKind::Annotation, None) => {
                        out.push_str(&format!("    void {name}({params});\n"));
                    }
                    (_, Some(ret)) => {
                        out.push_str(&format!("    public {ret} {name}({params}) {{\n"));
                        if let Some(value) = default_return_value(ret) {
                            out.push_str(&format!("        return {value};\n"));
                        }
                        out.push_str("    }\n");
                    }
                    // Constructor.
                    (_, None) => {
                        out.push_str(&format!("    public {name}({params}) {{\n    }}\n"));
                    }
                }
            }
        }

        out.push_str("}\n");
        out
    }
}

impl fmt::Display for JavaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

fn default_return_value(return_type: &str) -> Option<&'static str> {
    match return_type {
        "void" => None,
        "boolean" => Some("false"),
        "byte" | "short" | "int" | "long" | "char" => Some("0"),
        "float" | "double" => Some("0.0"),
        _ => Some("null"),
    }
}
