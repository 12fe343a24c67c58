#[cfg(test)]
pub const CONFIG_DATA: &str = r##"
[site]
title = "Aurelia Blog"
url = "https://blog.example.com"
description = "Aurelia Blog posts"

[paths]
blog_src = "blog/src"
out_dir = "public"

[defaults]
page_size = 2

[rss_feed]
title = "Aurelia feed"
"##;

#[cfg(test)]
pub const DRAFT_DATA: &str = "<!--
[NAME]: # (Hello World)
[TAGS]: # (rust blog)
-->

# Hello World

This is the first paragraph.

<!-- more -->

And this is the rest of the post.
";

#[cfg(test)]
pub const PUBLISHED_DATA: &str = "<!--
[ID]: # (5b0e4bd4-63b8-4ac5-a09d-2b8de8e2a7f1)
[NAME]: # (Second post)
[PUBLISHED_AT]: # (2024-03-01 08:00:00.000)
[UPDATED_AT]: # (2024-03-02 09:30:00.250)
[SLUG]: # (second-post)
[DESCRIPTION]: # (The second one)
[AUTHOR]: # (Jane)
[LAYOUT]: # (wide)
-->

# Second post

Summary of the second post.

<!-- more -->

Rest of the second post.
";

#[cfg(test)]
pub const NEW_DRAFT_DATA: &str = "<!--
[ID]: # (bcfc427f-f9f3-4442-bfc2-deca95db96d5)
[NAME]: # (This is a title)
[AUTHOR]: # (Jane)
[TAGS]: # ()
-->

# This is a title

This is a body example
Please remove it and replace with your content

<!-- more -->

And this is the rest of your post
";
