//! Edge case tests for minjs-out: parse, print, and check the emitted text.

#[cfg(test)]
mod tests {
    use crate::{print_program, OutputMode, OutputSettings};
    use minjs_par::{ParseSettings, Parser};
    use minjs_util::{Document, Handler};

    fn print_with(source: &str, settings: &OutputSettings) -> String {
        let doc = Document::new("test.js", source);
        let handler = Handler::new();
        let parse_settings = ParseSettings {
            preserve_important_comments: settings.preserve_important_comments,
            ..Default::default()
        };
        let parser = Parser::new(&doc, &handler, parse_settings);
        let output = parser.parse();
        print_program(&output.program, settings)
    }

    fn minify(source: &str) -> String {
        print_with(source, &OutputSettings::default())
    }

    #[test]
    fn test_var_with_constants() {
        // literal evaluation is an external pass; values print back
        assert_eq!(minify("var x = 0.5e2 + 0x10;"), "var x=50+16");
    }

    #[test]
    fn test_if_else() {
        assert_eq!(minify("if(a==b)c();else d();"), "if(a==b)c();else d()");
    }

    #[test]
    fn test_asi_return_split() {
        assert_eq!(minify("function f(){return\n1}"), "function f(){return;1}");
    }

    #[test]
    fn test_object_literal_property_names() {
        assert_eq!(minify("a={b:1,\"c d\":2,3:4};"), "a={b:1,\"c d\":2,3:4}");
    }

    #[test]
    fn test_object_literal_unquotes_simple_names() {
        assert_eq!(minify("a={\"b\":1};"), "a={b:1}");
        // always-reserved words stay quoted
        assert_eq!(minify("a={\"new\":1};"), "a={\"new\":1}");
        // get/set are never reserved
        assert_eq!(minify("a={get:1};"), "a={get:1}");
    }

    #[test]
    fn test_strict_contextual_property_names() {
        // `static` is only reserved in strict code
        assert_eq!(minify("a={static:1};"), "a={static:1}");
        assert_eq!(
            minify("'use strict';a={static:1};"),
            "\"use strict\";a={\"static\":1}"
        );
        // inside a strict function body too
        assert_eq!(
            minify("function f(){'use strict';return{let:1}}"),
            "function f(){\"use strict\";return{\"let\":1}}"
        );
    }

    #[test]
    fn test_minify_code_off_preserves_lexemes() {
        let settings = OutputSettings {
            minify_code: false,
            ..Default::default()
        };
        assert_eq!(print_with("var x = 0.5e2;", &settings), "var x=0.5e2");
        assert_eq!(print_with("s = \"it's\";", &settings), "s=\"it's\"");
        // property names keep their quoting as written
        assert_eq!(print_with("a={\"b\":1};", &settings), "a={\"b\":1}");
        assert_eq!(print_with("a={b:1};", &settings), "a={b:1}");
    }

    #[test]
    fn test_for_in_empty_body() {
        assert_eq!(minify("for(var i in o);"), "for(var i in o);");
    }

    #[test]
    fn test_important_comment_preserved() {
        assert_eq!(
            minify("/*! copyright */ var x=1;"),
            "/*! copyright */\nvar x=1"
        );
    }

    #[test]
    fn test_subtraction_grouping_preserved() {
        assert_eq!(minify("a - (b - c);"), "a-(b-c)");
        assert_eq!(minify("(a - b) - c;"), "a-b-c");
    }

    #[test]
    fn test_multiplication_over_addition() {
        assert_eq!(minify("a * (b + c);"), "a*(b+c)");
        // associative multiply regroups freely
        assert_eq!(minify("a * (b * c);"), "a*b*c");
    }

    #[test]
    fn test_division_not_regrouped() {
        assert_eq!(minify("a / (b / c);"), "a/(b/c)");
    }

    #[test]
    fn test_new_inner_parens_survive() {
        // the zero-argument list drops, the callee parens cannot
        assert_eq!(minify("new (f())();"), "new(f())");
    }

    #[test]
    fn test_new_zero_arg_constructor() {
        assert_eq!(minify("var a = new X();"), "var a=new X");
        // unless its result is immediately called or dereferenced
        assert_eq!(minify("var b = new X().m;"), "var b=(new X).m");
    }

    #[test]
    fn test_no_in_wrapped_inside_for_init() {
        assert_eq!(minify("for (var x = (a in b); x;);"), "for(var x=(a in b);x;);");
    }

    #[test]
    fn test_in_unwrapped_outside_for() {
        assert_eq!(minify("if ((a in b)) c();"), "if(a in b)c()");
    }

    #[test]
    fn test_plus_runs_spaced() {
        assert_eq!(minify("a + +b;"), "a+ +b");
        assert_eq!(minify("a++ + b;"), "a+++b");
        assert_eq!(minify("a + ++b;"), "a+ ++b");
    }

    #[test]
    fn test_typeof_spacing() {
        assert_eq!(minify("typeof x;"), "typeof x");
        assert_eq!(minify("typeof (x + y);"), "typeof(x+y)");
        assert_eq!(minify("void 0;"), "void 0");
    }

    #[test]
    fn test_numeric_member_parenthesized() {
        assert_eq!(minify("x = (4).toString();"), "x=(4).toString()");
        assert_eq!(minify("x = (4.5).toString();"), "x=4.5.toString()");
    }

    #[test]
    fn test_string_delimiter_choice() {
        assert_eq!(minify("s = 'it\\'s';"), "s=\"it's\"");
        assert_eq!(minify("s = \"say \\\"hi\\\"\";"), "s='say \"hi\"'");
    }

    #[test]
    fn test_regex_emitted() {
        assert_eq!(minify("var re = /ab+c/gi;"), "var re=/ab+c/gi");
    }

    #[test]
    fn test_function_expression_statement_wrapped() {
        assert_eq!(minify("(function(){ a(); })();"), "(function(){a()}())");
    }

    #[test]
    fn test_empty_and_block_statements() {
        assert_eq!(minify(";"), ";");
        assert_eq!(minify("{ a(); b(); }"), "{a();b()}");
    }

    #[test]
    fn test_array_holes_survive() {
        assert_eq!(minify("x = [1,,2];"), "x=[1,,2]");
        assert_eq!(minify("x = [,];"), "x=[,]");
    }

    #[test]
    fn test_getter_setter_output() {
        assert_eq!(
            minify("o = { get x() { return 1 }, set x(v) {} };"),
            "o={get x(){return 1},set x(v){}}"
        );
    }

    #[test]
    fn test_switch_output() {
        assert_eq!(
            minify("switch(x){case 1: a(); break; default: b()}"),
            "switch(x){case 1:a();break;default:b()}"
        );
    }

    #[test]
    fn test_do_while_output() {
        assert_eq!(minify("do a(); while(b);"), "do a();while(b)");
    }

    #[test]
    fn test_dangling_else_braced() {
        assert_eq!(minify("if(a){if(b)c()}else d();"), "if(a){if(b)c()}else d()");
    }

    #[test]
    fn test_labeled_loop() {
        assert_eq!(
            minify("outer: for(;;) { continue outer; }"),
            "outer:for(;;){continue outer}"
        );
    }

    #[test]
    fn test_conditional_and_comma() {
        assert_eq!(minify("x = a ? b : c;"), "x=a?b:c");
        assert_eq!(minify("a, b, c;"), "a,b,c");
        assert_eq!(minify("x = (a, b);"), "x=(a,b)");
    }

    #[test]
    fn test_term_semicolons_setting() {
        let settings = OutputSettings {
            term_semicolons: true,
            ..Default::default()
        };
        assert_eq!(print_with("var a = 1", &settings), "var a=1;");
    }

    #[test]
    fn test_multiline_output() {
        let settings = OutputSettings {
            output_mode: OutputMode::MultipleLines,
            indent_size: 2,
            ..Default::default()
        };
        let out = print_with("if(a==b)c();else d();", &settings);
        assert_eq!(out, "if(a==b)\n  c();\nelse\n  d()");
    }

    #[test]
    fn test_strict_directive_inserted_for_strict_function() {
        // the directive node survives and reprints
        assert_eq!(
            minify("function f(){'use strict';return 1}"),
            "function f(){\"use strict\";return 1}"
        );
    }

    #[test]
    fn test_cc_on_deduplicated() {
        let out = minify("/*@cc_on @*/ var a; /*@cc_on @*/ var b;");
        assert_eq!(out.matches("cc_on").count(), 1);
    }

    #[test]
    fn test_debugger_stripped_when_configured() {
        let doc = Document::new("test.js", "a(); debugger; b();");
        let handler = Handler::new();
        let parser = Parser::new(
            &doc,
            &handler,
            ParseSettings {
                strip_debug_statements: true,
                ..Default::default()
            },
        );
        let output = parser.parse();
        let text = print_program(&output.program, &OutputSettings::default());
        assert_eq!(text, "a();b()");
    }
}
