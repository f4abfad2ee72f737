//! The bundled default source/sink catalog and structural handler
//! detectors, grounded on the reference `DummyRuler`.

use ahash::AHashSet;

use crate::features::taint_analysis::ports::{NodeView, RuleOracle};

const SINKS: &[&str] = &[
    // command injection
    "os/exec.Command",
    "os/exec.CommandContext",
    "syscall.Exec",
    "syscall.ForkExec",
    "syscall.StartProcess",
    // sql injection
    "(*database/sql.DB).Exec",
    "(*database/sql.DB).ExecContext",
    "(*database/sql.DB).Query",
    "(*database/sql.DB).QueryContext",
    "(*database/sql.DB).QueryRow",
    "(*database/sql.DB).QueryRowContext",
    "(*database/sql.Stmt).Exec",
    "(*database/sql.Stmt).ExecContext",
    "(*database/sql.Stmt).Query",
    "(*database/sql.Stmt).QueryContext",
    "(*database/sql.Stmt).QueryRow",
    "(*database/sql.Stmt).QueryRowContext",
    "(*database/sql.Tx).Exec",
    "(*database/sql.Tx).ExecContext",
    "(*database/sql.Tx).Query",
    "(*database/sql.Tx).QueryContext",
    "(*database/sql.Tx).QueryRow",
    "(*database/sql.Tx).QueryRowContext",
    "(*github.com/jmoiron/sqlx.DB).Select",
    "(*github.com/jmoiron/sqlx.DB).Get",
    "(*github.com/jmoiron/sqlx.DB).Queryx",
    "(*github.com/jmoiron/sqlx.DB).QueryRowx",
    "(*gorm.io/gorm.DB).Raw",
    "(*gorm.io/gorm.DB).Where",
    "(*gorm.io/gorm.DB).Or",
    "(*gorm.io/gorm.DB).Order",
    "(*xorm.io/xorm.Engine).Query",
    "(*xorm.io/xorm.Engine).Exec",
    "(*xorm.io/xorm.Engine).QueryString",
    "(*xorm.io/xorm.Engine).QueryInterface",
    "(*xorm.io/xorm.Engine).Where",
    "(*xorm.io/xorm.Engine).OrderBy",
    "(*xorm.io/xorm.Engine).SQL",
    "(*xorm.io/xorm.Session).Query",
    "(*xorm.io/xorm.Session).Exec",
    "(*xorm.io/xorm.Session).QuerySliceString",
    "(*xorm.io/xorm.Session).QueryInterface",
    "(*xorm.io/xorm.Session).And",
    "(*xorm.io/xorm.Session).Or",
    "(*xorm.io/xorm.Session).Where",
    "(*xorm.io/xorm.Session).OrderBy",
    "(*xorm.io/xorm.Session).SQL",
    "(github.com/Masterminds/squirrel.SelectBuilder).From",
    "(github.com/Masterminds/squirrel.SelectBuilder).Where",
    "(github.com/Masterminds/squirrel.SelectBuilder).OrderBy",
    // ssrf
    "net/http.Get",
    "net/http.Head",
    "net/http.Post",
    "net/http.PostForm",
    "(*net/http.Client).Do",
    "(*net/http.Client).Get",
    "(*net/http.Client).Head",
    "(*net/http.Client).Post",
    "(*net/http.Client).PostForm",
    "(*github.com/hashicorp/go-retryablehttp.Client).Do",
    "(*github.com/hashicorp/go-retryablehttp.Client).Get",
    "(*github.com/hashicorp/go-retryablehttp.Client).Head",
    "(*github.com/hashicorp/go-retryablehttp.Client).Post",
    "(*github.com/hashicorp/go-retryablehttp.Client).PostForm",
    "(*github.com/go-resty/resty/v2.Request).Get",
    "(*github.com/go-resty/resty/v2.Request).Post",
    "(*github.com/go-resty/resty/v2.Request).Put",
    "(*github.com/go-resty/resty/v2.Request).Delete",
    "(*github.com/go-resty/resty/v2.Request).Options",
    "(*github.com/go-resty/resty/v2.Request).Patch",
    "(*github.com/go-resty/resty/v2.Request).Send",
    "(*github.com/go-resty/resty/v2.Request).Execute",
    "github.com/sethgrid/pester.Do",
    "github.com/sethgrid/pester.Get",
    "github.com/sethgrid/pester.Head",
    "github.com/sethgrid/pester.Post",
    "github.com/sethgrid/pester.PostForm",
    "(*github.com/sethgrid/pester.Client).Do",
    "(*github.com/sethgrid/pester.Client).Get",
    "(*github.com/sethgrid/pester.Client).Head",
    "(*github.com/sethgrid/pester.Client).Post",
    "(*github.com/sethgrid/pester.Client).PostForm",
    "(*github.com/imroc/req.Request).SetURL",
    "(*github.com/dghubble/sling).Base",
    "(*github.com/dghubble/sling).Get",
    "(*github.com/dghubble/sling).Head",
    "(*github.com/dghubble/sling).Post",
    "(*github.com/dghubble/sling).Put",
    "(*github.com/dghubble/sling).Patch",
    "(*github.com/dghubble/sling).Delete",
    "(*github.com/dghubble/sling).Options",
    "(*github.com/dghubble/sling).Trace",
    "(*github.com/dghubble/sling).Connect",
    "github.com/asmcos/requests.Get",
    "github.com/asmcos/requests.Post",
    "github.com/asmcos/requests.PostJson",
    "(*github.com/asmcos/requests.Request).Get",
    "(*github.com/asmcos/requests.Request).Post",
    "(*github.com/asmcos/requests.Request).PostJson",
    "github.com/carlmjohnson/requests.URL",
    "(*github.com/carlmjohnson/requests.Builder).Host",
    "(*github.com/carlmjohnson/requests.Builder).Do",
    "github.com/mozillazg/request.Get",
    "github.com/mozillazg/request.Head",
    "github.com/mozillazg/request.Post",
    "github.com/mozillazg/request.Put",
    "github.com/mozillazg/request.Patch",
    "github.com/mozillazg/request.Delete",
    "github.com/mozillazg/request.Options",
    "(*github.com/mozillazg/request.Request).Get",
    "(*github.com/mozillazg/request.Request).Head",
    "(*github.com/mozillazg/request.Request).Post",
    "(*github.com/mozillazg/request.Request).Put",
    "(*github.com/mozillazg/request.Request).Patch",
    "(*github.com/mozillazg/request.Request).Delete",
    "(*github.com/mozillazg/request.Request).Options",
    // path traversal
    "os.Create",
    "os.Open",
    "os.OpenFile",
    "os.ReadFile",
    "io/ioutil.ReadFile",
    "io/ioutil.WriteFile",
];

const SOURCES: &[&str] = &["os.ReadFile"];

/// Faithful port of the reference `DummyRuler`: a fixed sink/source catalog
/// plus structural detection of HTTP-handler-shaped functions.
pub struct DefaultRuleOracle {
    module_names: Vec<String>,
    sinks: AHashSet<&'static str>,
    sources: AHashSet<&'static str>,
}

impl DefaultRuleOracle {
    pub fn new(module_names: Vec<String>) -> Self {
        DefaultRuleOracle {
            module_names,
            sinks: SINKS.iter().copied().collect(),
            sources: SOURCES.iter().copied().collect(),
        }
    }
}

impl RuleOracle for DefaultRuleOracle {
    fn is_intra(&self, canonical: &str) -> bool {
        self.module_names.iter().any(|name| {
            canonical.starts_with(name.as_str())
                || canonical.starts_with(&format!("({name}"))
                || canonical.starts_with(&format!("(*{name}"))
        })
    }

    fn is_source(&self, node: &NodeView<'_>) -> bool {
        if self.sources.contains(node.canonical) {
            return true;
        }
        check_trivial_handler(node) || check_gin_handler(node) || check_beego_handler(node)
    }

    fn is_sink(&self, node: &NodeView<'_>) -> bool {
        self.sinks.contains(node.canonical)
    }
}

fn check_trivial_handler(node: &NodeView<'_>) -> bool {
    let has_writer = node
        .param_types
        .iter()
        .any(|t| t == "net/http.ResponseWriter");
    let has_request = node.param_types.iter().any(|t| t == "*net/http.Request");
    has_writer && has_request
}

fn check_gin_handler(node: &NodeView<'_>) -> bool {
    node.param_types
        .iter()
        .any(|t| t == "*github.com/gin-gonic/gin.Context")
}

fn check_beego_handler(node: &NodeView<'_>) -> bool {
    const BEEGO_CONTROLLERS: &[&str] = &[
        "github.com/beego/beego/v2/server/web.Controller",
        "github.com/beego/beego/beego.Controller",
        "github.com/astaxie/beego/beego.Controller",
    ];
    node.receiver_embeds
        .iter()
        .any(|e| BEEGO_CONTROLLERS.contains(&e.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(canonical: &'a str, param_types: &'a [String], embeds: &'a [String]) -> NodeView<'a> {
        NodeView {
            canonical,
            param_types,
            receiver_embeds: embeds,
        }
    }

    #[test]
    fn classifies_known_sink() {
        let oracle = DefaultRuleOracle::new(vec!["pkg".into()]);
        assert!(oracle.is_sink(&view("os/exec.Command", &[], &[])));
        assert!(!oracle.is_sink(&view("pkg.F", &[], &[])));
    }

    #[test]
    fn classifies_http_handler_as_source() {
        let oracle = DefaultRuleOracle::new(vec!["pkg".into()]);
        let params = vec!["net/http.ResponseWriter".to_string(), "*net/http.Request".to_string()];
        assert!(oracle.is_source(&view("pkg.Handler", &params, &[])));
    }

    #[test]
    fn is_intra_matches_module_prefix_and_receiver_forms() {
        let oracle = DefaultRuleOracle::new(vec!["pkg".into()]);
        assert!(oracle.is_intra("pkg.F"));
        assert!(oracle.is_intra("(pkg.T).M"));
        assert!(oracle.is_intra("(*pkg.T).M"));
        assert!(!oracle.is_intra("other.F"));
    }
}
