//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use assetrev::{AssetRevisionPlugin, BuildOutput, HashFunction, HtmlEmission, RevisionOptions};

    use crate::common::{Route, StubServer};

    fn sha256_plugin() -> AssetRevisionPlugin {
        AssetRevisionPlugin::new(RevisionOptions {
            hash: HashFunction::Sha256,
            ..RevisionOptions::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn replaces_html_and_keeps_output_name() {
        let server = StubServer::start(&[("/app.js", Route::ok("console.log(1)"))]).await;
        let plugin = sha256_plugin();
        let mut output = BuildOutput::new("/static/");

        let data = HtmlEmission {
            html: format!(
                r#"<html><head></head><body><script src="{}" md5="x"></script></body></html>"#,
                server.url("/app.js")
            ),
            output_name: "pages/about.html".to_string(),
        };
        let emission = plugin.before_emit(data, &mut output).await.unwrap();

        assert_eq!(emission.output_name, "pages/about.html");
        assert_eq!(
            emission.html,
            r#"<html><head></head><body><script src="/static/app-0a286891.js"></script></body></html>"#
        );
        assert_eq!(output.len(), 1);
    }

    #[tokio::test]
    async fn runs_are_independent() {
        let server = StubServer::start(&[
            ("/one.css", Route::ok("body{color:red}")),
            ("/two.css", Route::ok("h1{margin:0}")),
        ])
        .await;
        let plugin = sha256_plugin();
        let mut output = BuildOutput::new("/");

        for (page, asset) in [("a.html", "/one.css"), ("b.html", "/two.css")] {
            let data = HtmlEmission {
                html: format!(r#"<html><head><link href="{}" rev></head></html>"#, server.url(asset)),
                output_name: page.to_string(),
            };
            plugin.before_emit(data, &mut output).await.unwrap();
        }

        let names: Vec<&str> = output.assets().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["one-15c42ab7.css", "two-85ab25a4.css"]);
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use assetrev::{AssetRevisionPlugin, BuildOutput, HtmlEmission, RevisionError, RevisionOptions};

    use crate::common::{Route, StubServer};

    #[tokio::test]
    async fn error_reaches_the_host() {
        let server = StubServer::start(&[("/ok.css", Route::ok("body{color:red}"))]).await;
        let plugin = AssetRevisionPlugin::new(RevisionOptions::default()).unwrap();
        let mut output = BuildOutput::new("/");

        let data = HtmlEmission {
            html: format!(
                r#"<html><head><link href="{}" rev><link href="{}" rev></head></html>"#,
                server.url("/ok.css"),
                server.url("/missing.css"),
            ),
            output_name: "index.html".to_string(),
        };
        let result = plugin.before_emit(data, &mut output).await;

        match result {
            Err(RevisionError::Fetch { url, .. }) => assert_eq!(url, server.url("/missing.css")),
            other => panic!("expected a failed fetch, got {other:?}"),
        }
        assert!(output.is_empty());
    }
}
