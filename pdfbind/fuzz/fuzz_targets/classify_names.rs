#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfbind::classify::{Classifier, Role, RoleResolver};
use pdfbind::events::NullSink;
use pdfbind::source::SourceFile;

// Role resolution must not depend on the order the folder was listed in.
fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let files: Vec<SourceFile> = s
        .split('\n')
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .map(|name| SourceFile::from_path(format!("/project/{name}.pdf")))
        .collect();

    let mut reversed = files.clone();
    reversed.reverse();

    let classifier = Classifier::default();
    let resolver = RoleResolver::new();
    let forward = resolver.resolve(&classifier.classify(&files), &mut NullSink);
    let backward = resolver.resolve(&classifier.classify(&reversed), &mut NullSink);

    for role in Role::ALL {
        assert_eq!(forward.get(role), backward.get(role));
    }
});
