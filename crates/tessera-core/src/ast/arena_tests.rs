use crate::ast::{
    AstContext, Decl, DeclContext, DeclKind, DeclName, FileUnit, FuncSignature, LocalContext,
    Module, NominalBody, TypeKind,
};

fn module_with_file(ctx: &mut AstContext, name: &str) -> (crate::ast::ModuleId, crate::ast::FileId) {
    let sym = ctx.intern(name);
    let module = ctx.add_module(Module::new(sym));
    let file = ctx.add_file(FileUnit::new(module, format!("{name}.src")));
    (module, file)
}

fn named(ctx: &mut AstContext, name: &str) -> DeclName {
    DeclName::Identifier(ctx.intern(name))
}

#[test]
fn intern_type_hash_conses() {
    let mut ctx = AstContext::new();
    let int = ctx.intern("Int");

    let a = ctx.intern_type(TypeKind::Builtin { name: int });
    let b = ctx.intern_type(TypeKind::Builtin { name: int });
    let paren = ctx.intern_type(TypeKind::Paren { underlying: a });

    assert_eq!(a, b);
    assert_ne!(a, paren);
    assert_eq!(ctx.type_count(), 2);
}

#[test]
fn add_file_registers_with_module() {
    let mut ctx = AstContext::new();
    let (module, file) = module_with_file(&mut ctx, "M");

    assert_eq!(ctx.module(module).files, vec![file]);
    assert_eq!(ctx.file(file).module, module);
    assert_eq!(ctx.find_module("M"), Some(module));
    assert_eq!(ctx.find_module("N"), None);
}

#[test]
fn add_member_appends_to_parent() {
    let mut ctx = AstContext::new();
    let (_, file) = module_with_file(&mut ctx, "M");
    let s_name = named(&mut ctx, "S");
    let s = ctx.add_top_level_decl(
        file,
        Decl::new(s_name, DeclContext::File(file), DeclKind::Struct(NominalBody::default())),
    );
    let f_name = named(&mut ctx, "f");
    let f = ctx.add_member(
        s,
        Decl::new(
            f_name,
            DeclContext::Decl(s),
            DeclKind::Func {
                signature: FuncSignature::default(),
                static_spelling: Default::default(),
                mutating: false,
                operator: None,
            },
        ),
    );

    assert_eq!(ctx.decl(s).kind.members(), Some(&[f][..]));
    assert_eq!(ctx.file(file).top_level_decls, vec![s]);
}

#[test]
#[should_panic(expected = "cannot own members")]
fn add_member_to_func_panics() {
    let mut ctx = AstContext::new();
    let (_, file) = module_with_file(&mut ctx, "M");
    let f = ctx.add_top_level_decl(
        file,
        Decl::new(
            DeclName::Anonymous,
            DeclContext::File(file),
            DeclKind::TopLevelCode,
        ),
    );
    ctx.add_member(f, Decl::new(DeclName::Anonymous, DeclContext::Decl(f), DeclKind::IfConfig));
}

#[test]
fn module_of_nested_decl() {
    let mut ctx = AstContext::new();
    let (module, file) = module_with_file(&mut ctx, "M");
    let s_name = named(&mut ctx, "S");
    let s = ctx.add_top_level_decl(
        file,
        Decl::new(s_name, DeclContext::File(file), DeclKind::Struct(NominalBody::default())),
    );
    let t_name = named(&mut ctx, "T");
    let t = ctx.add_member(
        s,
        Decl::new(t_name, DeclContext::Decl(s), DeclKind::Struct(NominalBody::default())),
    );

    assert_eq!(ctx.module_of_decl(t), module);
    assert_eq!(ctx.file_of_decl(t), Some(file));
    assert_eq!(
        ctx.module_scope_context(DeclContext::Decl(t)),
        DeclContext::File(file)
    );
    assert_eq!(ctx.parent_context(DeclContext::Decl(t)), Some(DeclContext::Decl(s)));
    assert_eq!(ctx.parent_context(DeclContext::Module(module)), None);
}

#[test]
fn closure_context_is_local() {
    let mut ctx = AstContext::new();
    let (_, file) = module_with_file(&mut ctx, "M");
    let s_name = named(&mut ctx, "S");
    let s = ctx.add_top_level_decl(
        file,
        Decl::new(s_name, DeclContext::File(file), DeclKind::Struct(NominalBody::default())),
    );
    let int = ctx.intern("Int");
    let ty = ctx.intern_type(TypeKind::Builtin { name: int });
    let closure = ctx.add_local_context(LocalContext::Closure {
        ty,
        implicit: false,
        discriminator: 0,
        parent: DeclContext::Decl(s),
    });

    assert!(ctx.is_local_context(DeclContext::Local(closure)));
    assert!(!ctx.is_local_context(DeclContext::Decl(s)));
    assert!(!ctx.is_local_context(DeclContext::File(file)));
}

#[test]
fn decl_inside_func_is_local() {
    let mut ctx = AstContext::new();
    let (_, file) = module_with_file(&mut ctx, "M");
    let f_name = named(&mut ctx, "f");
    let f = ctx.add_top_level_decl(
        file,
        Decl::new(
            f_name,
            DeclContext::File(file),
            DeclKind::Func {
                signature: FuncSignature::default(),
                static_spelling: Default::default(),
                mutating: false,
                operator: None,
            },
        ),
    );

    assert!(ctx.is_local_context(DeclContext::Decl(f)));
}

#[test]
fn qualified_name_walks_contexts() {
    let mut ctx = AstContext::new();
    let (module, _) = module_with_file(&mut ctx, "M");
    let s_name = named(&mut ctx, "S");
    let s = ctx.add_decl(Decl::new(
        s_name,
        DeclContext::Module(module),
        DeclKind::Struct(NominalBody::default()),
    ));
    let s_ty = ctx.nominal_type(s);
    let ext = ctx.add_decl(Decl::new(
        DeclName::Anonymous,
        DeclContext::Module(module),
        DeclKind::Extension {
            extended_type: s_ty,
            members: Vec::new(),
            inherited: Vec::new(),
            conformances: Vec::new(),
        },
    ));
    let p_name = named(&mut ctx, "P");
    let p = ctx.add_member(
        ext,
        Decl::new(p_name, DeclContext::Decl(ext), DeclKind::Struct(NominalBody::default())),
    );

    assert_eq!(ctx.qualified_name(s), "M.S");
    assert_eq!(ctx.qualified_name(p), "M.S.P");
    assert_eq!(ctx.nominal_of_type(s_ty), Some(s));
}
